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
//! # Dynamic role
//!
//! Dynamic role describes how the credentials are minted on every request:
//! either the root identity of the cloud account is used directly, or an
//! ephemeral user is created for the request.
use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::BuilderError;
use crate::role::types::{RoleScope, SecretType};

/// Dynamic role record.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct DynamicRole {
    /// Role name.
    pub name: String,
    /// Cloud account name.
    pub cloud: String,
    /// Hand out the root identity of the cloud account.
    #[builder(default)]
    #[serde(default)]
    pub root: bool,
    /// Lease (in seconds) of the ephemeral user passwords. Never set for the
    /// root roles.
    #[builder(default)]
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Secret kind.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: SecretType,
    /// Groups the ephemeral users are added to.
    #[builder(default)]
    #[serde(default)]
    pub user_groups: Vec<String>,
    /// Roles granted to the ephemeral users.
    #[builder(default)]
    #[serde(default)]
    pub user_roles: Vec<String>,
    /// Scope of the issued credentials.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

/// New dynamic role.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct DynamicRoleCreate {
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
    /// Hand out the root identity of the cloud account.
    #[builder(default)]
    #[serde(default)]
    pub root: bool,
    /// Lease (in seconds) of the ephemeral user passwords.
    #[builder(default)]
    #[serde(default)]
    #[validate(range(min = 1))]
    pub ttl: Option<u64>,
    /// Secret kind, `token` when not set.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: Option<SecretType>,
    /// Groups the ephemeral users are added to.
    #[builder(default)]
    #[serde(default)]
    pub user_groups: Vec<String>,
    /// Roles granted to the ephemeral users.
    #[builder(default)]
    #[serde(default)]
    pub user_roles: Vec<String>,
    /// Scope of the issued credentials.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

/// Dynamic role update.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct DynamicRoleUpdate {
    /// Cloud account name.
    #[builder(default)]
    #[serde(default)]
    pub cloud: Option<String>,
    /// Hand out the root identity of the cloud account.
    #[builder(default)]
    #[serde(default)]
    pub root: Option<bool>,
    /// Lease (in seconds) of the ephemeral user passwords.
    #[builder(default)]
    #[serde(default)]
    #[validate(range(min = 1))]
    pub ttl: Option<u64>,
    /// Secret kind.
    #[builder(default)]
    #[serde(default)]
    pub secret_type: Option<SecretType>,
    /// Groups the ephemeral users are added to.
    #[builder(default)]
    #[serde(default)]
    pub user_groups: Option<Vec<String>>,
    /// Roles granted to the ephemeral users.
    #[builder(default)]
    #[serde(default)]
    pub user_roles: Option<Vec<String>>,
    /// Scope of the issued credentials. An empty value unsets the field.
    #[builder(default)]
    #[serde(flatten)]
    pub scope: RoleScope,
    /// Additional values merged into the issued credentials.
    #[builder(default)]
    #[serde(default)]
    pub extensions: Option<BTreeMap<String, String>>,
}
