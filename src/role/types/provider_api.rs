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
//! # Role provider API
use async_trait::async_trait;

use crate::engine::EngineState;
use crate::role::{RoleProviderError, types::*};

/// Role provider interface.
#[async_trait]
pub trait RoleApi: Send + Sync {
    /// Create the dynamic role.
    async fn create_dynamic_role(
        &self,
        state: &EngineState,
        role: DynamicRoleCreate,
    ) -> Result<DynamicRole, RoleProviderError>;

    /// Delete the dynamic role.
    async fn delete_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError>;

    /// Fetch the dynamic role.
    async fn get_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<DynamicRole>, RoleProviderError>;

    /// List names of the dynamic roles.
    async fn list_dynamic_roles(
        &self,
        state: &EngineState,
        params: &RoleListParameters,
    ) -> Result<Vec<String>, RoleProviderError>;

    /// Update the dynamic role.
    async fn update_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: DynamicRoleUpdate,
    ) -> Result<DynamicRole, RoleProviderError>;

    /// Create the static role and rotate the password of its user.
    async fn create_static_role(
        &self,
        state: &EngineState,
        role: StaticRoleCreate,
    ) -> Result<StaticRoleInfo, RoleProviderError>;

    /// Delete the static role. The bound user is left untouched.
    async fn delete_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError>;

    /// Fetch the static role record including the secret.
    async fn get_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRole>, RoleProviderError>;

    /// List names of the static roles.
    async fn list_static_roles(
        &self,
        state: &EngineState,
        params: &RoleListParameters,
    ) -> Result<Vec<String>, RoleProviderError>;

    /// Fetch the public fields of the static role.
    async fn read_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRoleInfo>, RoleProviderError>;

    /// Persist the static role record as is.
    ///
    /// Used by the rotation, which holds the rotation lock of the cloud.
    async fn store_static_role(
        &self,
        state: &EngineState,
        role: &StaticRole,
    ) -> Result<(), RoleProviderError>;

    /// Update the static role.
    async fn update_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: StaticRoleUpdate,
    ) -> Result<StaticRoleInfo, RoleProviderError>;
}
