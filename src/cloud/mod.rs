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
//! # Cloud account provider
//!
//! A cloud account holds the administrative (root) credentials of one
//! Keystone identity service. The provider persists the cloud account
//! records and owns the registry of the [`SharedCloud`] entries caching the
//! authenticated client of every account.
//!
//! The client of a cloud is authenticated with the root credentials on first
//! use and reused afterwards. It is dropped whenever the credentials change
//! (administrative update, root rotation) or the account is deleted. A cached
//! client whose session is about to expire is authenticated again.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{OwnedMutexGuard, RwLock};
use tracing::{debug, info};
use validator::Validate;

pub mod backend;
pub mod error;
#[cfg(test)]
mod mock;
mod shared;
pub mod template;
pub mod types;

use crate::client::{IdentityClient, IdentityConnector, KeystoneConnector};
use crate::config::Config;
use crate::engine::EngineState;
use crate::password::{PasswordPolicyGenerator, Passwords};
use crate::plugin_manager::PluginManager;
use backend::{CloudBackend, kv::KvBackend};
use template::UsernameTemplate;
use types::*;

pub use error::CloudProviderError;
#[cfg(test)]
pub use mock::MockCloudProvider;
pub use shared::SharedCloud;
pub use types::CloudApi;

/// Cloud account provider.
pub struct CloudProvider {
    /// Backend driver.
    backend_driver: Arc<dyn CloudBackend>,

    /// Identity connector authenticating the cloud clients.
    connector: Arc<dyn IdentityConnector>,

    /// Password policy generator of the host.
    password_generator: Option<Arc<dyn PasswordPolicyGenerator>>,

    /// Shared cloud registry.
    clouds: RwLock<HashMap<String, Arc<SharedCloud>>>,
}

impl CloudProvider {
    pub fn new(config: &Config, plugin_manager: &PluginManager) -> Result<Self, CloudProviderError> {
        let backend_driver: Arc<dyn CloudBackend> =
            if let Some(driver) = plugin_manager.get_cloud_backend(&config.cloud.driver) {
                driver.clone()
            } else {
                match config.cloud.driver.as_str() {
                    "kv" => Arc::new(KvBackend::default()),
                    _ => {
                        return Err(CloudProviderError::UnsupportedDriver(
                            config.cloud.driver.clone(),
                        ));
                    }
                }
            };
        let connector: Arc<dyn IdentityConnector> = match plugin_manager.get_identity_connector() {
            Some(connector) => connector.clone(),
            None => Arc::new(KeystoneConnector::new(&config.client)?),
        };
        Ok(Self {
            backend_driver,
            connector,
            password_generator: plugin_manager.get_password_policy_generator().cloned(),
            clouds: RwLock::new(HashMap::new()),
        })
    }

    /// Get or register the shared entry of the cloud account.
    async fn shared_cloud(&self, name: &str) -> Arc<SharedCloud> {
        {
            let guard = self.clouds.read().await;
            if let Some(shared) = guard.get(name) {
                return shared.clone();
            }
        }
        let mut guard = self.clouds.write().await;
        guard
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(SharedCloud::new(name)))
            .clone()
    }

    /// Password generator bound to the policy of the account.
    fn passwords(&self, state: &EngineState, account: &CloudAccount) -> Passwords {
        Passwords::new(
            account.password_policy.clone(),
            state.config.password.length,
            self.password_generator.clone(),
        )
    }

    /// Check that the effective username template of the account renders.
    fn check_username_template(
        &self,
        state: &EngineState,
        template: Option<&str>,
    ) -> Result<(), CloudProviderError> {
        UsernameTemplate::parse(template.unwrap_or(&state.config.cloud.username_template))?;
        Ok(())
    }

    /// Check the credentials of the account against the identity service.
    async fn verify(&self, account: &CloudAccount) -> Result<(), CloudProviderError> {
        self.connector.connect(&account.root_auth()?).await?;
        debug!("credentials of the cloud {} verified", account.name);
        Ok(())
    }
}

#[async_trait]
impl CloudApi for CloudProvider {
    /// Register new cloud account.
    #[tracing::instrument(level = "info", skip(self, state, cloud), fields(name = %cloud.name))]
    async fn create_cloud(
        &self,
        state: &EngineState,
        cloud: CloudAccountCreate,
    ) -> Result<CloudAccountInfo, CloudProviderError> {
        cloud.validate()?;
        if cloud.password.expose_secret().is_empty() {
            return Err(CloudProviderError::MissingField("password"));
        }
        let username_template = cloud.username_template.filter(|x| !x.is_empty());
        self.check_username_template(state, username_template.as_deref())?;

        let shared = self.shared_cloud(&cloud.name).await;
        let _guard = shared.lock_rotation().await;
        if self
            .backend_driver
            .get_cloud(state, &cloud.name)
            .await?
            .is_some()
        {
            return Err(CloudProviderError::Conflict(cloud.name));
        }

        let root_password_ttl = match cloud.root_password_ttl {
            Some(ttl) => Some(ttl),
            None => Some(state.config.rotation.root_password_ttl),
        }
        .filter(|ttl| *ttl > 0);
        let mut account = CloudAccount {
            name: cloud.name,
            auth_url: cloud.auth_url,
            username: cloud.username,
            password: cloud.password,
            user_domain_name: cloud.user_domain_name,
            username_template,
            password_policy: cloud.password_policy.filter(|x| !x.is_empty()),
            root_password_ttl,
            root_password_expires_at: None,
        };
        account.reset_root_password_expiry(Utc::now());
        if cloud.validate {
            self.verify(&account).await?;
        }

        self.backend_driver.put_cloud(state, &account).await?;
        shared.bind_passwords(self.passwords(state, &account)).await;
        shared.invalidate().await;
        info!("cloud {} registered", account.name);
        Ok(account.info())
    }

    /// Delete the cloud account and drop its cached client.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn delete_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), CloudProviderError> {
        let shared = self.shared_cloud(name).await;
        {
            let _guard = shared.lock_rotation().await;
            self.backend_driver.delete_cloud(state, name).await?;
            shared.invalidate().await;
        }
        self.clouds.write().await.remove(name);
        info!("cloud {} deleted", name);
        Ok(())
    }

    /// Generate a new password according to the policy of the cloud account.
    async fn generate_password<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<SecretString, CloudProviderError> {
        let shared = self.shared_cloud(name).await;
        let passwords = match shared.passwords().await {
            Some(passwords) => passwords,
            None => {
                let account = self
                    .backend_driver
                    .get_cloud(state, name)
                    .await?
                    .ok_or_else(|| CloudProviderError::NotConfigured(name.to_string()))?;
                let passwords = self.passwords(state, &account);
                shared.bind_passwords(passwords.clone()).await;
                passwords
            }
        };
        Ok(passwords.generate().await?)
    }

    /// Fetch the cloud account.
    async fn get_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<CloudAccount>, CloudProviderError> {
        self.backend_driver.get_cloud(state, name).await
    }

    /// Get the authenticated client of the cloud account.
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get_client<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Arc<dyn IdentityClient>, CloudProviderError> {
        let shared = self.shared_cloud(name).await;
        let valid_until =
            Utc::now() + TimeDelta::seconds(state.config.client.token_refresh_margin);
        shared
            .get_or_connect(valid_until, || async {
                let account = self
                    .backend_driver
                    .get_cloud(state, name)
                    .await?
                    .ok_or_else(|| CloudProviderError::NotConfigured(name.to_string()))?;
                shared.bind_passwords(self.passwords(state, &account)).await;
                let client = self.connector.connect(&account.root_auth()?).await?;
                debug!("cloud {} authenticated", name);
                Ok::<_, CloudProviderError>(client)
            })
            .await
    }

    /// Drop the cached client of the cloud account.
    async fn invalidate<'a>(&self, name: &'a str) {
        let shared = self.clouds.read().await.get(name).cloned();
        if let Some(shared) = shared {
            shared.invalidate().await;
            debug!("cached client of the cloud {} dropped", name);
        }
    }

    /// List names of the cloud accounts.
    async fn list_clouds(&self, state: &EngineState) -> Result<Vec<String>, CloudProviderError> {
        self.backend_driver.list_clouds(state).await
    }

    /// Acquire the rotation lock of the cloud account.
    async fn lock_cloud<'a>(&self, name: &'a str) -> OwnedMutexGuard<()> {
        self.shared_cloud(name).await.lock_rotation().await
    }

    /// Persist the cloud account record as is.
    async fn store_cloud(
        &self,
        state: &EngineState,
        account: &CloudAccount,
    ) -> Result<(), CloudProviderError> {
        self.backend_driver.put_cloud(state, account).await?;
        self.shared_cloud(&account.name)
            .await
            .bind_passwords(self.passwords(state, account))
            .await;
        Ok(())
    }

    /// Update the cloud account.
    #[tracing::instrument(level = "info", skip(self, state, data))]
    async fn update_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: CloudAccountUpdate,
    ) -> Result<CloudAccountInfo, CloudProviderError> {
        data.validate()?;
        let shared = self.shared_cloud(name).await;
        let _guard = shared.lock_rotation().await;
        let mut account = self
            .backend_driver
            .get_cloud(state, name)
            .await?
            .ok_or_else(|| CloudProviderError::NotConfigured(name.to_string()))?;

        let mut reset_expiry = false;
        if let Some(val) = data.auth_url {
            account.auth_url = val;
        }
        if let Some(val) = data.username {
            account.username = val;
        }
        if let Some(val) = data.user_domain_name {
            account.user_domain_name = val;
        }
        if let Some(val) = data.password {
            if val.expose_secret().is_empty() {
                return Err(CloudProviderError::MissingField("password"));
            }
            account.password = val;
            reset_expiry = true;
        }
        if let Some(val) = data.username_template {
            account.username_template = Some(val).filter(|x| !x.is_empty());
        }
        if let Some(val) = data.password_policy {
            account.password_policy = Some(val).filter(|x| !x.is_empty());
        }
        if let Some(val) = data.root_password_ttl {
            account.root_password_ttl = Some(val).filter(|x| *x > 0);
            reset_expiry = true;
        }
        self.check_username_template(state, account.username_template.as_deref())?;
        if reset_expiry {
            account.reset_root_password_expiry(Utc::now());
        }
        if data.validate {
            self.verify(&account).await?;
        }

        self.backend_driver.put_cloud(state, &account).await?;
        shared.bind_passwords(self.passwords(state, &account)).await;
        shared.invalidate().await;
        info!("cloud {} updated", name);
        Ok(account.info())
    }
}
