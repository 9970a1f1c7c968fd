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
//! # Role provider
//!
//! Following concepts are covered by the provider:
//!
//! ## Dynamic role
//!
//! Describes how the credentials are minted on every request. A root role
//! hands out the root identity of the cloud account (the password as is, or
//! a scoped token), other roles create an ephemeral user for every request.
//!
//! ## Static role
//!
//! Binds a pre-existing user of the cloud. The ID of the user is resolved
//! once when the role is created, and the password of the user is rotated
//! immediately afterwards. Every later rotation targets the same user ID.
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tracing::info;
use validator::Validate;

pub mod backend;
pub mod error;
#[cfg(test)]
mod mock;
pub mod types;
pub mod validation;

use crate::client::types::UserListParameters;
use crate::cloud::{CloudApi, CloudProviderError, types::CloudAccount};
use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;
use crate::rotation::RotationApi;
use backend::{RoleBackend, kv::KvBackend};
use types::*;
use validation::{check_root_role, resolve_groups, resolve_roles};

pub use error::RoleProviderError;
#[cfg(test)]
pub use mock::MockRoleProvider;
pub use types::RoleApi;

/// Role provider.
pub struct RoleProvider {
    backend_driver: Arc<dyn RoleBackend>,
}

fn required(val: Option<String>, field: &'static str) -> Result<String, RoleProviderError> {
    val.filter(|x| !x.is_empty())
        .ok_or(RoleProviderError::MissingField(field))
}

impl RoleProvider {
    pub fn new(config: &Config, plugin_manager: &PluginManager) -> Result<Self, RoleProviderError> {
        let backend_driver: Arc<dyn RoleBackend> =
            if let Some(driver) = plugin_manager.get_role_backend(&config.role.driver) {
                driver.clone()
            } else {
                match config.role.driver.as_str() {
                    "kv" => Arc::new(KvBackend::default()),
                    _ => {
                        return Err(RoleProviderError::UnsupportedDriver(
                            config.role.driver.clone(),
                        ));
                    }
                }
            };
        Ok(Self { backend_driver })
    }

    /// Fetch the referenced cloud account.
    async fn get_cloud(
        &self,
        state: &EngineState,
        name: &str,
    ) -> Result<CloudAccount, RoleProviderError> {
        state
            .provider
            .get_cloud_provider()
            .get_cloud(state, name)
            .await?
            .ok_or_else(|| CloudProviderError::NotConfigured(name.to_string()).into())
    }

    /// Check the groups and roles for the ephemeral users exist in the cloud.
    async fn check_user_entities(
        &self,
        state: &EngineState,
        role: &DynamicRole,
    ) -> Result<(), RoleProviderError> {
        if role.user_groups.is_empty() && role.user_roles.is_empty() {
            return Ok(());
        }
        let client = state
            .provider
            .get_cloud_provider()
            .get_client(state, &role.cloud)
            .await?;
        if !role.user_groups.is_empty() {
            let domain_id = client.token_info().await?.user.domain.id;
            resolve_groups(
                client.as_ref(),
                &role.cloud,
                domain_id.as_deref(),
                &role.user_groups,
            )
            .await?;
        }
        resolve_roles(client.as_ref(), &role.cloud, &role.user_roles).await?;
        Ok(())
    }

    /// Names of the roles bound to the cloud.
    async fn filter_by_cloud<T, F, Fut>(
        names: Vec<String>,
        params: &RoleListParameters,
        get: F,
    ) -> Result<Vec<String>, RoleProviderError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Option<T>, RoleProviderError>>,
        T: HasCloud,
    {
        let Some(cloud) = &params.cloud else {
            return Ok(names);
        };
        let mut res = Vec::new();
        for name in names {
            if let Some(role) = get(name.clone()).await?
                && role.cloud() == cloud
            {
                res.push(name);
            }
        }
        Ok(res)
    }
}

/// Role bound to a cloud account.
trait HasCloud {
    fn cloud(&self) -> &str;
}

impl HasCloud for DynamicRole {
    fn cloud(&self) -> &str {
        &self.cloud
    }
}

impl HasCloud for StaticRole {
    fn cloud(&self) -> &str {
        &self.cloud
    }
}

#[async_trait]
impl RoleApi for RoleProvider {
    /// Create the dynamic role.
    #[tracing::instrument(level = "info", skip(self, state, role), fields(name = %role.name))]
    async fn create_dynamic_role(
        &self,
        state: &EngineState,
        role: DynamicRoleCreate,
    ) -> Result<DynamicRole, RoleProviderError> {
        role.validate()?;
        let cloud = required(role.cloud, "cloud")?;
        self.get_cloud(state, &cloud).await?;
        if self
            .backend_driver
            .get_dynamic_role(state, &role.name)
            .await?
            .is_some()
        {
            return Err(RoleProviderError::Conflict(role.name));
        }

        let ttl = if role.root {
            role.ttl
        } else {
            Some(role.ttl.unwrap_or(state.config.role.default_ttl))
        };
        let entry = DynamicRole {
            name: role.name,
            cloud,
            root: role.root,
            ttl,
            secret_type: role.secret_type.unwrap_or_default(),
            user_groups: role.user_groups,
            user_roles: role.user_roles,
            scope: role.scope.normalized(),
            extensions: role.extensions,
        };
        check_root_role(&entry)?;
        self.check_user_entities(state, &entry).await?;

        self.backend_driver.put_dynamic_role(state, &entry).await?;
        info!("dynamic role {} created", entry.name);
        Ok(entry)
    }

    /// Delete the dynamic role.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn delete_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError> {
        self.backend_driver.delete_dynamic_role(state, name).await
    }

    /// Fetch the dynamic role.
    async fn get_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<DynamicRole>, RoleProviderError> {
        self.backend_driver.get_dynamic_role(state, name).await
    }

    /// List names of the dynamic roles.
    async fn list_dynamic_roles(
        &self,
        state: &EngineState,
        params: &RoleListParameters,
    ) -> Result<Vec<String>, RoleProviderError> {
        let names = self.backend_driver.list_dynamic_roles(state).await?;
        Self::filter_by_cloud(names, params, |name| async move {
            self.backend_driver.get_dynamic_role(state, &name).await
        })
        .await
    }

    /// Update the dynamic role.
    #[tracing::instrument(level = "info", skip(self, state, data))]
    async fn update_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: DynamicRoleUpdate,
    ) -> Result<DynamicRole, RoleProviderError> {
        data.validate()?;
        let mut entry = self
            .backend_driver
            .get_dynamic_role(state, name)
            .await?
            .ok_or_else(|| RoleProviderError::RoleNotFoundForUpdate(name.to_string()))?;

        let mut recheck = false;
        if let Some(cloud) = data.cloud.filter(|x| !x.is_empty())
            && cloud != entry.cloud
        {
            self.get_cloud(state, &cloud).await?;
            entry.cloud = cloud;
            recheck = true;
        }
        if let Some(root) = data.root {
            entry.root = root;
        }
        entry.ttl = match (entry.root, data.ttl) {
            (_, Some(ttl)) => Some(ttl),
            (true, None) => None,
            (false, None) => Some(entry.ttl.unwrap_or(state.config.role.default_ttl)),
        };
        if let Some(secret_type) = data.secret_type {
            entry.secret_type = secret_type;
        }
        if let Some(groups) = data.user_groups {
            entry.user_groups = groups;
            recheck = true;
        }
        if let Some(roles) = data.user_roles {
            entry.user_roles = roles;
            recheck = true;
        }
        entry.scope.merge(data.scope);
        if let Some(extensions) = data.extensions {
            entry.extensions = extensions;
        }
        check_root_role(&entry)?;
        if recheck {
            self.check_user_entities(state, &entry).await?;
        }

        self.backend_driver.put_dynamic_role(state, &entry).await?;
        info!("dynamic role {} updated", name);
        Ok(entry)
    }

    /// Create the static role and rotate the password of its user.
    #[tracing::instrument(level = "info", skip(self, state, role), fields(name = %role.name))]
    async fn create_static_role(
        &self,
        state: &EngineState,
        role: StaticRoleCreate,
    ) -> Result<StaticRoleInfo, RoleProviderError> {
        role.validate()?;
        let cloud = required(role.cloud, "cloud")?;
        let username = required(role.username, "username")?;
        self.get_cloud(state, &cloud).await?;

        let cloud_provider = state.provider.get_cloud_provider();
        let _guard = cloud_provider.lock_cloud(&cloud).await;
        if self
            .backend_driver
            .get_static_role(state, &role.name)
            .await?
            .is_some()
        {
            return Err(RoleProviderError::Conflict(role.name));
        }

        let client = cloud_provider.get_client(state, &cloud).await?;
        let domain_id = client.token_info().await?.user.domain.id;
        let params = UserListParameters {
            domain_id: domain_id.clone(),
            name: Some(username.clone()),
        };
        let user = client
            .list_users(&params)
            .await?
            .into_iter()
            .find(|user| user.name == username)
            .ok_or_else(|| RoleProviderError::UserNotFound {
                username: username.clone(),
                cloud: cloud.clone(),
            })?;

        let entry = StaticRole {
            name: role.name,
            cloud,
            username,
            user_id: user.id,
            user_domain_id: user.domain_id.or(domain_id),
            secret: SecretString::from(""),
            secret_type: role.secret_type.unwrap_or_default(),
            ttl: role.ttl.unwrap_or(state.config.role.static_rotation_ttl),
            rotated_at: Utc::now(),
            scope: role.scope.normalized(),
            extensions: role.extensions,
        };
        let entry = state
            .provider
            .get_rotation_provider()
            .initialize_static_role(state, entry)
            .await?;
        info!("static role {} created for the user {}", entry.name, entry.user_id);
        Ok(entry.info())
    }

    /// Delete the static role. The bound user is left untouched.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn delete_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError> {
        let Some(entry) = self.backend_driver.get_static_role(state, name).await? else {
            return Ok(());
        };
        let _guard = state
            .provider
            .get_cloud_provider()
            .lock_cloud(&entry.cloud)
            .await;
        self.backend_driver.delete_static_role(state, name).await
    }

    /// Fetch the static role record including the secret.
    async fn get_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRole>, RoleProviderError> {
        self.backend_driver.get_static_role(state, name).await
    }

    /// List names of the static roles.
    async fn list_static_roles(
        &self,
        state: &EngineState,
        params: &RoleListParameters,
    ) -> Result<Vec<String>, RoleProviderError> {
        let names = self.backend_driver.list_static_roles(state).await?;
        Self::filter_by_cloud(names, params, |name| async move {
            self.backend_driver.get_static_role(state, &name).await
        })
        .await
    }

    /// Fetch the public fields of the static role.
    async fn read_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRoleInfo>, RoleProviderError> {
        Ok(self
            .backend_driver
            .get_static_role(state, name)
            .await?
            .map(|role| role.info()))
    }

    /// Persist the static role record as is.
    async fn store_static_role(
        &self,
        state: &EngineState,
        role: &StaticRole,
    ) -> Result<(), RoleProviderError> {
        self.backend_driver.put_static_role(state, role).await
    }

    /// Update the static role.
    #[tracing::instrument(level = "info", skip(self, state, data))]
    async fn update_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: StaticRoleUpdate,
    ) -> Result<StaticRoleInfo, RoleProviderError> {
        data.validate()?;
        let cloud = self
            .backend_driver
            .get_static_role(state, name)
            .await?
            .ok_or_else(|| RoleProviderError::RoleNotFoundForUpdate(name.to_string()))?
            .cloud;
        if data.cloud.as_ref().is_some_and(|x| *x != cloud) {
            return Err(RoleProviderError::ImmutableField("cloud"));
        }

        // The rotation replaces the secret while holding the lock.
        let _guard = state.provider.get_cloud_provider().lock_cloud(&cloud).await;
        let mut entry = self
            .backend_driver
            .get_static_role(state, name)
            .await?
            .ok_or_else(|| RoleProviderError::RoleNotFoundForUpdate(name.to_string()))?;
        if data.username.as_ref().is_some_and(|x| *x != entry.username) {
            return Err(RoleProviderError::ImmutableField("username"));
        }
        if let Some(ttl) = data.ttl {
            entry.ttl = ttl;
        }
        if let Some(secret_type) = data.secret_type {
            entry.secret_type = secret_type;
        }
        entry.scope.merge(data.scope);
        if let Some(extensions) = data.extensions {
            entry.extensions = extensions;
        }

        self.backend_driver.put_static_role(state, &entry).await?;
        info!("static role {} updated", name);
        Ok(entry.info())
    }
}
