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
//! # Cloud account
use chrono::{DateTime, TimeDelta, Utc};
use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::client::types::{Domain, PasswordAuth, PasswordAuthBuilder, Scope};
use crate::common::{serialize_optional_secret, serialize_secret};
use crate::error::BuilderError;

/// Cloud account record.
///
/// Administrative credentials of one identity service account. The password
/// is the credential currently valid at the identity service and is only
/// changed together with the identity service by the root rotation.
#[derive(Builder, Clone, Debug, Deserialize, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CloudAccount {
    /// Unique name of the cloud account.
    pub name: String,
    /// Identity endpoint.
    pub auth_url: String,
    /// Root user name.
    pub username: String,
    /// Root user password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    /// Domain name of the root user.
    pub user_domain_name: String,
    /// Template for the names of the ephemeral users.
    #[builder(default)]
    #[serde(default)]
    pub username_template: Option<String>,
    /// Password policy.
    #[builder(default)]
    #[serde(default)]
    pub password_policy: Option<String>,
    /// Lifetime (in seconds) of the root password.
    #[builder(default)]
    #[serde(default)]
    pub root_password_ttl: Option<u64>,
    /// Expiration time of the current root password.
    #[builder(default)]
    #[serde(default)]
    pub root_password_expires_at: Option<DateTime<Utc>>,
}

impl CloudAccount {
    /// Root password authentication scoped to the domain of the root user.
    pub fn root_auth(&self) -> Result<PasswordAuth, BuilderError> {
        self.password_auth(Some(Scope::Domain(Domain {
            id: None,
            name: Some(self.user_domain_name.clone()),
        })))
    }

    /// Root password authentication with the requested scope.
    pub fn password_auth(&self, scope: Option<Scope>) -> Result<PasswordAuth, BuilderError> {
        let mut builder = PasswordAuthBuilder::default();
        builder
            .auth_url(self.auth_url.clone())
            .username(self.username.clone())
            .password(self.password.clone())
            .user_domain_name(self.user_domain_name.clone());
        if let Some(scope) = scope {
            builder.scope(scope);
        }
        builder.build()
    }

    /// Start the lifetime of a new root password at the given time.
    pub fn reset_root_password_expiry(&mut self, now: DateTime<Utc>) {
        self.root_password_expires_at = self
            .root_password_ttl
            .filter(|ttl| *ttl > 0)
            .and_then(|ttl| i64::try_from(ttl).ok())
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl));
    }

    /// Whether the root password expired at the given time.
    pub fn root_password_expired(&self, now: DateTime<Utc>) -> bool {
        self.root_password_expires_at
            .is_some_and(|expires_at| expires_at <= now)
    }

    /// Public representation of the account.
    pub fn info(&self) -> CloudAccountInfo {
        CloudAccountInfo {
            name: self.name.clone(),
            auth_url: self.auth_url.clone(),
            username: self.username.clone(),
            user_domain_name: self.user_domain_name.clone(),
            username_template: self.username_template.clone(),
            password_policy: self.password_policy.clone(),
            root_password_ttl: self.root_password_ttl,
            root_password_expires_at: self.root_password_expires_at,
        }
    }
}

/// Public fields of the cloud account.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CloudAccountInfo {
    /// Unique name of the cloud account.
    pub name: String,
    /// Identity endpoint.
    pub auth_url: String,
    /// Root user name.
    pub username: String,
    /// Domain name of the root user.
    pub user_domain_name: String,
    /// Template for the names of the ephemeral users.
    pub username_template: Option<String>,
    /// Password policy.
    pub password_policy: Option<String>,
    /// Lifetime (in seconds) of the root password.
    pub root_password_ttl: Option<u64>,
    /// Expiration time of the current root password.
    pub root_password_expires_at: Option<DateTime<Utc>>,
}

/// New cloud account.
#[derive(Builder, Clone, Debug, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CloudAccountCreate {
    /// Unique name of the cloud account.
    #[validate(
        length(min = 1, max = 255),
        custom(function = "crate::common::validate_name")
    )]
    pub name: String,
    /// Identity endpoint.
    #[validate(url)]
    pub auth_url: String,
    /// Root user name.
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// Root user password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    /// Domain name of the root user.
    #[validate(length(min = 1, max = 255))]
    pub user_domain_name: String,
    /// Template for the names of the ephemeral users.
    #[builder(default)]
    #[serde(default)]
    pub username_template: Option<String>,
    /// Password policy.
    #[builder(default)]
    #[serde(default)]
    pub password_policy: Option<String>,
    /// Lifetime (in seconds) of the root password. The configured default
    /// applies when not set, `0` disables the expiration.
    #[builder(default)]
    #[serde(default)]
    pub root_password_ttl: Option<u64>,
    /// Verify the credentials against the identity service before storing
    /// the account.
    #[builder(default)]
    #[serde(default)]
    pub validate: bool,
}

/// Cloud account update.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct CloudAccountUpdate {
    /// Identity endpoint.
    #[builder(default)]
    #[validate(url)]
    pub auth_url: Option<String>,
    /// Root user name.
    #[builder(default)]
    #[validate(length(min = 1, max = 255))]
    pub username: Option<String>,
    /// Root user password.
    #[builder(default)]
    #[serde(default, serialize_with = "serialize_optional_secret")]
    pub password: Option<SecretString>,
    /// Domain name of the root user.
    #[builder(default)]
    #[validate(length(min = 1, max = 255))]
    pub user_domain_name: Option<String>,
    /// Template for the names of the ephemeral users.
    #[builder(default)]
    pub username_template: Option<String>,
    /// Password policy. An empty value removes the policy.
    #[builder(default)]
    pub password_policy: Option<String>,
    /// Lifetime (in seconds) of the root password, `0` disables the
    /// expiration.
    #[builder(default)]
    pub root_password_ttl: Option<u64>,
    /// Verify the resulting credentials against the identity service before
    /// storing the account.
    #[builder(default)]
    #[serde(default)]
    pub validate: bool,
}
