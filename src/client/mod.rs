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
//! # Keystone client
//!
//! Access to the Keystone v3 identity API of a cloud.
//!
//! An [`IdentityConnector`] authenticates against the identity endpoint and
//! produces an [`IdentityClient`] bound to the resulting session token. The
//! session is reused for all subsequent calls until it expires or the client
//! is dropped from the cache of the cloud account.
//!
//! [`KeystoneConnector`] implements the connector over the Keystone HTTP/JSON
//! protocol.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

pub mod error;
mod keystone;
pub mod types;

pub use error::ClientError;
pub use keystone::{KeystoneClient, KeystoneConnector, identity_endpoint};
use types::*;

/// Authenticated identity client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Identity endpoint the client talks to.
    fn auth_url(&self) -> String;

    /// Expiration time of the session token.
    fn expires_at(&self) -> DateTime<Utc>;

    /// Introspect the session token of the client.
    async fn token_info(&self) -> Result<TokenInfo, ClientError>;

    /// Authenticate with the password credentials and return the new token.
    async fn issue_token(&self, auth: &PasswordAuth) -> Result<IssuedToken, ClientError>;

    /// Revoke the token.
    async fn revoke_token(&self, token: &SecretString) -> Result<(), ClientError>;

    /// Create the user.
    async fn create_user(&self, user: &UserCreate) -> Result<User, ClientError>;

    /// Delete the user.
    async fn delete_user<'a>(&self, user_id: &'a str) -> Result<(), ClientError>;

    /// List users.
    async fn list_users(&self, params: &UserListParameters) -> Result<Vec<User>, ClientError>;

    /// Change the password of the user. The identity service verifies the
    /// original password.
    async fn change_password<'a>(
        &self,
        user_id: &'a str,
        original_password: &SecretString,
        password: &SecretString,
    ) -> Result<(), ClientError>;

    /// Set the password of the user without knowing the current one.
    async fn reset_password<'a>(
        &self,
        user_id: &'a str,
        password: &SecretString,
    ) -> Result<(), ClientError>;

    /// List groups.
    async fn list_groups(&self, params: &GroupListParameters) -> Result<Vec<Group>, ClientError>;

    /// List roles.
    async fn list_roles(&self, params: &RoleListParameters) -> Result<Vec<Role>, ClientError>;

    /// List projects.
    async fn list_projects(
        &self,
        params: &ProjectListParameters,
    ) -> Result<Vec<Project>, ClientError>;

    /// Add the user to the group.
    async fn add_user_to_group<'a>(
        &self,
        group_id: &'a str,
        user_id: &'a str,
    ) -> Result<(), ClientError>;

    /// Grant the role to the user.
    async fn grant_role(&self, grant: &RoleGrant) -> Result<(), ClientError>;
}

/// Identity connector.
///
/// Authenticates against the identity service producing the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityConnector: Send + Sync {
    /// Authenticate with the password credentials.
    async fn connect(&self, auth: &PasswordAuth) -> Result<Arc<dyn IdentityClient>, ClientError>;
}
