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
//! # Credential provider
//!
//! Issues the credentials of the dynamic roles:
//!
//! | root  | secret type | credentials                          | lease           | revocation            |
//! |-------|-------------|--------------------------------------|-----------------|-----------------------|
//! | true  | token       | token of the root user               | token lifetime  | revoke the token      |
//! | true  | password    | root credentials as they are         | none            | none                  |
//! | false | token       | token of a new ephemeral user        | token lifetime  | revoke, delete user   |
//! | false | password    | credentials of a new ephemeral user  | role TTL        | delete user           |
//!
//! The lease of a token never outlives the token granted by the identity
//! service.
//!
//! Static role credentials are the stored password of the role user or a
//! token issued with it.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info, warn};

pub mod error;
#[cfg(test)]
mod mock;
pub mod types;
mod user;

use crate::client::types::PasswordAuthBuilder;
use crate::client::{ClientError, IdentityClient};
use crate::cloud::types::CloudAccount;
use crate::cloud::{CloudApi, CloudProviderError};
use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;
use crate::role::RoleApi;
use crate::role::types::{DynamicRole, SecretType, StaticRole};

pub use error::CredentialProviderError;
#[cfg(test)]
pub use mock::MockCredentialProvider;
pub use types::*;

/// Credential provider.
#[derive(Clone, Debug, Default)]
pub struct CredentialProvider {}

impl CredentialProvider {
    pub fn new(
        _config: &Config,
        _plugin_manager: &PluginManager,
    ) -> Result<Self, CredentialProviderError> {
        Ok(Self {})
    }
}

async fn get_account(
    state: &EngineState,
    cloud: &str,
) -> Result<(CloudAccount, Arc<dyn IdentityClient>), CredentialProviderError> {
    let cloud_provider = state.provider.get_cloud_provider();
    let account = cloud_provider
        .get_cloud(state, cloud)
        .await?
        .ok_or_else(|| CloudProviderError::NotConfigured(cloud.to_string()))?;
    let client = cloud_provider.get_client(state, cloud).await?;
    Ok((account, client))
}

async fn revoke_token(client: &dyn IdentityClient, token: &SecretString) -> Result<(), ClientError> {
    match client.revoke_token(token).await {
        Err(err) if err.is_not_found() => {
            debug!("token is already revoked");
            Ok(())
        }
        other => other,
    }
}

async fn delete_user(client: &dyn IdentityClient, user_id: &str) -> Result<(), ClientError> {
    match client.delete_user(user_id).await {
        Err(err) if err.is_not_found() => {
            debug!("user {} is already deleted", user_id);
            Ok(())
        }
        other => other,
    }
}

/// Issue the root credentials.
async fn issue_root(
    account: &CloudAccount,
    client: &dyn IdentityClient,
    role: &DynamicRole,
) -> Result<IssuedCredential, CredentialProviderError> {
    let issued_at = Utc::now();
    let (payload, lease, revocation) = match role.secret_type {
        SecretType::Token => {
            let scope = role.scope.token_scope(&account.user_domain_name);
            let auth = account.password_auth(Some(scope))?;
            let token = client.issue_token(&auth).await?;
            (
                CredentialPayload::Token {
                    auth_url: account.auth_url.clone(),
                    user_id: None,
                    token: token.token.clone(),
                    expires_at: token.info.expires_at,
                },
                Some(Lease::until(issued_at, token.info.expires_at)),
                Revocation::Token {
                    cloud: account.name.clone(),
                    token: token.token,
                },
            )
        }
        SecretType::Password => (
            CredentialPayload::RootPassword {
                auth_url: account.auth_url.clone(),
                user_domain_name: account.user_domain_name.clone(),
                username: account.username.clone(),
                password: account.password.clone(),
            },
            None,
            Revocation::None,
        ),
    };
    Ok(IssuedCredential {
        role: role.name.clone(),
        payload,
        extensions: role.extensions.clone(),
        lease,
        revocation,
    })
}

/// Issue the credentials of a new ephemeral user.
async fn issue_ephemeral(
    state: &EngineState,
    account: &CloudAccount,
    client: &dyn IdentityClient,
    role: &DynamicRole,
) -> Result<IssuedCredential, CredentialProviderError> {
    let user::EphemeralUser { user, password } =
        user::provision(state, client, account, role).await?;
    let issued_at = Utc::now();
    let (payload, lease, revocation) = match role.secret_type {
        SecretType::Token => {
            let mut auth = PasswordAuthBuilder::default();
            auth.auth_url(account.auth_url.clone())
                .username(user.name.clone())
                .password(password);
            if let Some(domain_id) = &user.domain_id {
                auth.user_domain_id(domain_id.clone());
            } else {
                auth.user_domain_name(account.user_domain_name.clone());
            }
            auth.scope(role.scope.token_scope(&account.user_domain_name));
            let token: Result<_, CredentialProviderError> = match auth.build() {
                Ok(auth) => client.issue_token(&auth).await.map_err(Into::into),
                Err(err) => Err(err.into()),
            };
            let token = match token {
                Ok(token) => token,
                Err(err) => return Err(user::discard(client, &user.id, err).await),
            };
            (
                CredentialPayload::Token {
                    auth_url: account.auth_url.clone(),
                    user_id: Some(user.id.clone()),
                    token: token.token.clone(),
                    expires_at: token.info.expires_at,
                },
                Lease::until(issued_at, token.info.expires_at),
                Revocation::TokenAndUser {
                    cloud: account.name.clone(),
                    token: token.token,
                    user_id: user.id,
                },
            )
        }
        SecretType::Password => (
            CredentialPayload::UserPassword {
                auth_url: account.auth_url.clone(),
                user_id: user.id.clone(),
                username: user.name,
                password,
                domain_id: user.domain_id,
                default_project_id: user.default_project_id,
            },
            Lease {
                ttl: role.ttl.unwrap_or(state.config.role.default_ttl),
                issued_at,
            },
            Revocation::User {
                cloud: account.name.clone(),
                user_id: user.id,
            },
        ),
    };
    Ok(IssuedCredential {
        role: role.name.clone(),
        payload,
        extensions: role.extensions.clone(),
        lease: Some(lease),
        revocation,
    })
}

/// Credentials of the static role.
async fn static_credentials(
    state: &EngineState,
    role: StaticRole,
) -> Result<IssuedCredential, CredentialProviderError> {
    let cloud_provider = state.provider.get_cloud_provider();
    let account = cloud_provider
        .get_cloud(state, &role.cloud)
        .await?
        .ok_or_else(|| CloudProviderError::NotConfigured(role.cloud.clone()))?;
    let issued_at = Utc::now();
    let (payload, lease, revocation) = match role.secret_type {
        SecretType::Password => (
            CredentialPayload::StaticPassword {
                auth_url: account.auth_url.clone(),
                username: role.username.clone(),
                password: role.secret.clone(),
                user_domain_id: role.user_domain_id.clone(),
            },
            Lease::until(issued_at, role.rotation_due_at()),
            Revocation::None,
        ),
        SecretType::Token => {
            let client = cloud_provider.get_client(state, &role.cloud).await?;
            let mut auth = PasswordAuthBuilder::default();
            auth.auth_url(account.auth_url.clone())
                .username(role.username.clone())
                .password(role.secret.clone());
            if let Some(domain_id) = &role.user_domain_id {
                auth.user_domain_id(domain_id.clone());
            } else {
                auth.user_domain_name(account.user_domain_name.clone());
            }
            auth.scope(role.scope.token_scope(&account.user_domain_name));
            let token = client.issue_token(&auth.build()?).await?;
            (
                CredentialPayload::Token {
                    auth_url: account.auth_url.clone(),
                    user_id: None,
                    token: token.token.clone(),
                    expires_at: token.info.expires_at,
                },
                Lease::until(issued_at, token.info.expires_at),
                Revocation::Token {
                    cloud: account.name.clone(),
                    token: token.token,
                },
            )
        }
    };
    Ok(IssuedCredential {
        role: role.name,
        payload,
        extensions: role.extensions,
        lease: Some(lease),
        revocation,
    })
}

#[async_trait]
impl CredentialApi for CredentialProvider {
    /// Issue the credentials of the dynamic role.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn issue<'a>(
        &self,
        state: &EngineState,
        role: &'a str,
    ) -> Result<IssuedCredential, CredentialProviderError> {
        let role = state
            .provider
            .get_role_provider()
            .get_dynamic_role(state, role)
            .await?
            .ok_or_else(|| CredentialProviderError::RoleNotFound(role.to_string()))?;
        let (account, client) = get_account(state, &role.cloud).await?;
        let issued = if role.root {
            issue_root(&account, client.as_ref(), &role).await?
        } else {
            issue_ephemeral(state, &account, client.as_ref(), &role).await?
        };
        info!(
            "issued {} credentials of the role {}",
            role.secret_type, role.name
        );
        Ok(issued)
    }

    /// Read the credentials of the static role.
    #[tracing::instrument(level = "info", skip(self, state))]
    async fn read_static_credentials<'a>(
        &self,
        state: &EngineState,
        role: &'a str,
    ) -> Result<IssuedCredential, CredentialProviderError> {
        let role = state
            .provider
            .get_role_provider()
            .get_static_role(state, role)
            .await?
            .ok_or_else(|| CredentialProviderError::StaticRoleNotFound(role.to_string()))?;
        static_credentials(state, role).await
    }

    /// Revoke the token and delete the user referenced by the descriptor.
    ///
    /// Entities that no longer exist count as revoked. The user owning a
    /// token is always deleted, the token revocation error is only reported
    /// when the user deletion fails as well.
    #[tracing::instrument(level = "info", skip_all)]
    async fn revoke(
        &self,
        state: &EngineState,
        revocation: &Revocation,
    ) -> Result<(), CredentialProviderError> {
        let cloud_provider = state.provider.get_cloud_provider();
        match revocation {
            Revocation::None => {}
            Revocation::Token { cloud, token } => {
                let client = cloud_provider.get_client(state, cloud).await?;
                revoke_token(client.as_ref(), token).await?;
                info!("revoked the token issued for the cloud {}", cloud);
            }
            Revocation::User { cloud, user_id } => {
                let client = cloud_provider.get_client(state, cloud).await?;
                delete_user(client.as_ref(), user_id).await?;
                info!("deleted the ephemeral user {} of the cloud {}", user_id, cloud);
            }
            Revocation::TokenAndUser {
                cloud,
                token,
                user_id,
            } => {
                let client = cloud_provider.get_client(state, cloud).await?;
                let token_res = revoke_token(client.as_ref(), token).await;
                match (token_res, delete_user(client.as_ref(), user_id).await) {
                    (Ok(()), Ok(())) => {}
                    (Err(err), Ok(())) => {
                        warn!(
                            "token of the deleted user {} could not be revoked: {}",
                            user_id, err
                        );
                    }
                    (Ok(()), Err(err)) => return Err(err.into()),
                    (Err(token), Err(user)) => {
                        return Err(CredentialProviderError::Revocation { token, user });
                    }
                }
                info!("deleted the ephemeral user {} of the cloud {}", user_id, cloud);
            }
        }
        Ok(())
    }
}
