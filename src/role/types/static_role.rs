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
//! # Static role
//!
//! Static role binds a pre-existing Keystone user. The user ID is resolved
//! once when the role is created and the password of the user is rotated
//! by the engine afterwards.
use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::serialize_secret;
use crate::error::BuilderError;
use crate::role::types::{RoleScope, SecretType};

/// Static role record.
#[derive(Builder, Clone, Debug, Deserialize, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct StaticRole {
    /// Role name.
    pub name: String,
    /// Cloud account name.
    pub cloud: String,
    /// Name of the bound user.
    pub username: String,
    /// ID of the bound user.
    pub user_id: String,
    /// Domain ID of the bound user.
    #[builder(default)]
    #[serde(default)]
    pub user_domain_id: Option<String>,
    /// Password last set for the user.
    #[serde(serialize_with = "serialize_secret")]
    pub secret: SecretString,
    /// Secret kind.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: SecretType,
    /// Rotation interval in seconds.
    pub ttl: u64,
    /// Time of the last successful rotation.
    pub rotated_at: DateTime<Utc>,
    /// Scope of the issued credentials.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl StaticRole {
    /// Time the password is due for the rotation.
    pub fn rotation_due_at(&self) -> DateTime<Utc> {
        i64::try_from(self.ttl)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| self.rotated_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the rotation window elapsed at the given time.
    pub fn rotation_due(&self, now: DateTime<Utc>) -> bool {
        self.rotation_due_at() <= now
    }

    /// Public representation of the role.
    pub fn info(&self) -> StaticRoleInfo {
        StaticRoleInfo {
            name: self.name.clone(),
            cloud: self.cloud.clone(),
            username: self.username.clone(),
            secret_type: self.secret_type,
            ttl: self.ttl,
            rotated_at: self.rotated_at,
            scope: self.scope.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

/// Public fields of the static role.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StaticRoleInfo {
    /// Role name.
    pub name: String,
    /// Cloud account name.
    pub cloud: String,
    /// Name of the bound user.
    pub username: String,
    /// Secret kind.
    pub secret_type: SecretType,
    /// Rotation interval in seconds.
    pub ttl: u64,
    /// Time of the last successful rotation.
    pub rotated_at: DateTime<Utc>,
    /// Scope of the issued credentials.
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    pub extensions: BTreeMap<String, String>,
}

/// New static role.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct StaticRoleCreate {
    /// Role name.
    #[validate(
        length(min = 1, max = 255),
        custom(function = "crate::common::validate_name")
    )]
    pub name: String,
    /// Cloud account name.
    #[builder(default)]
    #[serde(default)]
    pub cloud: Option<String>,
    /// Name of the pre-existing user.
    #[builder(default)]
    #[serde(default)]
    pub username: Option<String>,
    /// Rotation interval in seconds.
    #[builder(default)]
    #[serde(default)]
    #[validate(range(min = 1))]
    pub ttl: Option<u64>,
    /// Secret kind, `token` when not set.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: Option<SecretType>,
    /// Scope of the issued credentials.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

/// Static role update.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct StaticRoleUpdate {
    /// Cloud account name. Can not be changed.
    #[builder(default)]
    #[serde(default)]
    pub cloud: Option<String>,
    /// Name of the bound user. Can not be changed.
    #[builder(default)]
    #[serde(default)]
    pub username: Option<String>,
    /// Rotation interval in seconds.
    #[builder(default)]
    #[serde(default)]
    #[validate(range(min = 1))]
    pub ttl: Option<u64>,
    /// Secret kind.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: Option<SecretType>,
    /// Scope of the issued credentials. An empty value unsets the field.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: Option<BTreeMap<String, String>>,
}
