// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Role provider - internal mocking tools.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;
use crate::role::{RoleApi, RoleProviderError, types::*};

#[cfg(test)]
mock! {
    pub RoleProvider {
        pub fn new(cfg: &Config, plugin_manager: &PluginManager) -> Result<Self, RoleProviderError>;
    }

    #[async_trait]
    impl RoleApi for RoleProvider {
        async fn create_dynamic_role(
            &self,
            state: &EngineState,
            role: DynamicRoleCreate,
        ) -> Result<DynamicRole, RoleProviderError>;

        async fn delete_dynamic_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<(), RoleProviderError>;

        async fn get_dynamic_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<Option<DynamicRole>, RoleProviderError>;

        async fn list_dynamic_roles(
            &self,
            state: &EngineState,
            params: &RoleListParameters,
        ) -> Result<Vec<String>, RoleProviderError>;

        async fn update_dynamic_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
            data: DynamicRoleUpdate,
        ) -> Result<DynamicRole, RoleProviderError>;

        async fn create_static_role(
            &self,
            state: &EngineState,
            role: StaticRoleCreate,
        ) -> Result<StaticRoleInfo, RoleProviderError>;

        async fn delete_static_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<(), RoleProviderError>;

        async fn get_static_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<Option<StaticRole>, RoleProviderError>;

        async fn list_static_roles(
            &self,
            state: &EngineState,
            params: &RoleListParameters,
        ) -> Result<Vec<String>, RoleProviderError>;

        async fn read_static_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<Option<StaticRoleInfo>, RoleProviderError>;

        async fn store_static_role(
            &self,
            state: &EngineState,
            role: &StaticRole,
        ) -> Result<(), RoleProviderError>;

        async fn update_static_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
            data: StaticRoleUpdate,
        ) -> Result<StaticRoleInfo, RoleProviderError>;
    }
}
