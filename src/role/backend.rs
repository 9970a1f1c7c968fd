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
//! # Role provider backends
use async_trait::async_trait;

use crate::engine::EngineState;
use crate::role::{RoleProviderError, types::*};

pub mod kv;

/// RoleBackend trait.
///
/// Backend driver interface expected by the role provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleBackend: Send + Sync {
    /// Fetch the dynamic role.
    async fn get_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<DynamicRole>, RoleProviderError>;

    /// Create or replace the dynamic role.
    async fn put_dynamic_role(
        &self,
        state: &EngineState,
        role: &DynamicRole,
    ) -> Result<(), RoleProviderError>;

    /// Delete the dynamic role.
    async fn delete_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError>;

    /// List names of the dynamic roles.
    async fn list_dynamic_roles(&self, state: &EngineState)
    -> Result<Vec<String>, RoleProviderError>;

    /// Fetch the static role.
    async fn get_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRole>, RoleProviderError>;

    /// Create or replace the static role.
    async fn put_static_role(
        &self,
        state: &EngineState,
        role: &StaticRole,
    ) -> Result<(), RoleProviderError>;

    /// Delete the static role.
    async fn delete_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError>;

    /// List names of the static roles.
    async fn list_static_roles(&self, state: &EngineState)
    -> Result<Vec<String>, RoleProviderError>;
}
