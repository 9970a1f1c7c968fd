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
//! # Rotation provider - internal mocking tools.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;
use crate::role::types::{StaticRole, StaticRoleInfo};
use crate::rotation::{RotationApi, RotationProviderError};

#[cfg(test)]
mock! {
    pub RotationProvider {
        pub fn new(cfg: &Config, plugin_manager: &PluginManager) -> Result<Self, RotationProviderError>;
    }

    #[async_trait]
    impl RotationApi for RotationProvider {
        async fn auto_rotate(&self, state: &EngineState) -> Result<Vec<String>, RotationProviderError>;

        async fn initialize_static_role(
            &self,
            state: &EngineState,
            role: StaticRole,
        ) -> Result<StaticRole, RotationProviderError>;

        async fn rotate_root<'a>(
            &self,
            state: &EngineState,
            cloud: &'a str,
        ) -> Result<(), RotationProviderError>;

        async fn rotate_static_role<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<StaticRoleInfo, RotationProviderError>;
    }
}
