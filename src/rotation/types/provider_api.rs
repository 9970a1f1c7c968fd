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
//! # Rotation provider API
use async_trait::async_trait;

use crate::engine::EngineState;
use crate::role::types::{StaticRole, StaticRoleInfo};
use crate::rotation::RotationProviderError;

/// Rotation provider interface.
#[async_trait]
pub trait RotationApi: Send + Sync {
    /// Rotate every root password and static role password that is due.
    ///
    /// Returns the rotated targets. Failing targets do not stop the
    /// remaining rotations and are reported together afterwards.
    async fn auto_rotate(&self, state: &EngineState) -> Result<Vec<String>, RotationProviderError>;

    /// Set the first password of the static role user and persist the role.
    ///
    /// The caller must hold the rotation lock of the role's cloud.
    async fn initialize_static_role(
        &self,
        state: &EngineState,
        role: StaticRole,
    ) -> Result<StaticRole, RotationProviderError>;

    /// Rotate the root password of the cloud account.
    async fn rotate_root<'a>(
        &self,
        state: &EngineState,
        cloud: &'a str,
    ) -> Result<(), RotationProviderError>;

    /// Rotate the password of the static role user.
    async fn rotate_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<StaticRoleInfo, RotationProviderError>;
}
