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
//! # Rotation provider
//!
//! ## Root rotation
//!
//! Replaces the root password of the cloud account. The rotation lock of the
//! account is taken before the account record is read, so that the second of
//! two concurrent rotations starts from the password set by the first one.
//! The identity service verifies the original password while changing it.
//! Once it accepted the new password the record is persisted and the cached
//! client is dropped (the identity service revokes the tokens of the user on
//! password change).
//!
//! ## Static role rotation
//!
//! Sets a new password of the user bound to the static role using the
//! administrative password reset, which does not require the current
//! password. The user is always addressed by the ID resolved when the role
//! was created.
//!
//! The change at the identity service and the persisting of the new password
//! run in a separate task holding the rotation lock. Dropping the caller
//! future does not interrupt them.
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, warn};

pub mod error;
#[cfg(test)]
mod mock;
pub mod types;

use crate::cloud::{CloudApi, CloudProviderError};
use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;
use crate::role::RoleApi;
use crate::role::types::{RoleListParameters, StaticRole, StaticRoleInfo};

pub use error::RotationProviderError;
#[cfg(test)]
pub use mock::MockRotationProvider;
pub use types::RotationApi;

/// Rotation provider.
#[derive(Clone, Debug, Default)]
pub struct RotationProvider {}

impl RotationProvider {
    pub fn new(
        _config: &Config,
        _plugin_manager: &PluginManager,
    ) -> Result<Self, RotationProviderError> {
        Ok(Self {})
    }

    /// Set a new password of the static role user and persist the role.
    ///
    /// `guard` is the rotation lock of the cloud when acquired by the
    /// rotation itself. It is released once the role is persisted.
    async fn set_static_password(
        &self,
        state: &EngineState,
        mut role: StaticRole,
        guard: Option<OwnedMutexGuard<()>>,
    ) -> Result<StaticRole, RotationProviderError> {
        let cloud_provider = state.provider.get_cloud_provider();
        let client = cloud_provider.get_client(state, &role.cloud).await?;
        let password = cloud_provider.generate_password(state, &role.cloud).await?;

        let state = state.clone();
        tokio::spawn(async move {
            let _guard = guard;
            client.reset_password(&role.user_id, &password).await?;
            role.secret = password;
            role.rotated_at = Utc::now();
            if let Err(err) = state
                .provider
                .get_role_provider()
                .store_static_role(&state, &role)
                .await
            {
                error!(
                    "password of the user {} of the static role {} was changed but could not be stored: {}",
                    role.user_id, role.name, err
                );
                return Err(err.into());
            }
            Ok::<_, RotationProviderError>(role)
        })
        .await?
    }
}

#[async_trait]
impl RotationApi for RotationProvider {
    /// Rotate every root password and static role password that is due.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn auto_rotate(&self, state: &EngineState) -> Result<Vec<String>, RotationProviderError> {
        let now = Utc::now();
        let mut rotated = Vec::new();
        let mut failed = Vec::new();

        let cloud_provider = state.provider.get_cloud_provider();
        for name in cloud_provider.list_clouds(state).await? {
            let target = format!("cloud `{name}`");
            let res = match cloud_provider.get_cloud(state, &name).await {
                Ok(Some(account)) if account.root_password_expired(now) => {
                    self.rotate_root(state, &name).await
                }
                Ok(_) => continue,
                Err(err) => Err(err.into()),
            };
            match res {
                Ok(()) => rotated.push(target),
                Err(err) => {
                    warn!("automatic rotation of the {} failed: {}", target, err);
                    failed.push(format!("{target}: {err}"));
                }
            }
        }

        let role_provider = state.provider.get_role_provider();
        for name in role_provider
            .list_static_roles(state, &RoleListParameters::default())
            .await?
        {
            let target = format!("static role `{name}`");
            let res = match role_provider.get_static_role(state, &name).await {
                Ok(Some(role)) if role.rotation_due(now) => self
                    .rotate_static_role(state, &name)
                    .await
                    .map(|_| ()),
                Ok(_) => continue,
                Err(err) => Err(err.into()),
            };
            match res {
                Ok(()) => rotated.push(target),
                Err(err) => {
                    warn!("automatic rotation of the {} failed: {}", target, err);
                    failed.push(format!("{target}: {err}"));
                }
            }
        }

        if !failed.is_empty() {
            return Err(RotationProviderError::AutoRotation(failed));
        }
        Ok(rotated)
    }

    /// Set the first password of the static role user and persist the role.
    async fn initialize_static_role(
        &self,
        state: &EngineState,
        role: StaticRole,
    ) -> Result<StaticRole, RotationProviderError> {
        self.set_static_password(state, role, None).await
    }

    /// Rotate the root password of the cloud account.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn rotate_root<'a>(
        &self,
        state: &EngineState,
        cloud: &'a str,
    ) -> Result<(), RotationProviderError> {
        let cloud_provider = state.provider.get_cloud_provider();
        let guard = cloud_provider.lock_cloud(cloud).await;
        let mut account = cloud_provider
            .get_cloud(state, cloud)
            .await?
            .ok_or_else(|| CloudProviderError::NotConfigured(cloud.to_string()))?;
        let client = cloud_provider.get_client(state, cloud).await?;
        let user_id = client.token_info().await?.user.id;
        let password = cloud_provider.generate_password(state, cloud).await?;

        let state = state.clone();
        tokio::spawn(async move {
            let _guard = guard;
            client
                .change_password(&user_id, &account.password, &password)
                .await?;
            account.password = password;
            account.reset_root_password_expiry(Utc::now());

            let cloud_provider = state.provider.get_cloud_provider();
            let res = cloud_provider.store_cloud(&state, &account).await;
            cloud_provider.invalidate(&account.name).await;
            if let Err(err) = res {
                error!(
                    "root password of the cloud {} was changed but could not be stored: {}",
                    account.name, err
                );
                return Err(err.into());
            }
            info!("root password of the cloud {} rotated", account.name);
            Ok::<_, RotationProviderError>(())
        })
        .await?
    }

    /// Rotate the password of the static role user.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn rotate_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<StaticRoleInfo, RotationProviderError> {
        let role_provider = state.provider.get_role_provider();
        let cloud = role_provider
            .get_static_role(state, name)
            .await?
            .ok_or_else(|| RotationProviderError::StaticRoleNotFound(name.to_string()))?
            .cloud;
        let guard = state.provider.get_cloud_provider().lock_cloud(&cloud).await;
        // re-read under the lock
        let role = role_provider
            .get_static_role(state, name)
            .await?
            .ok_or_else(|| RotationProviderError::StaticRoleNotFound(name.to_string()))?;

        let role = self.set_static_password(state, role, Some(guard)).await?;
        info!("password of the static role {} rotated", name);
        Ok(role.info())
    }
}
