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
//! # Keystone client types
//!
//! Types exchanged with the Keystone v3 identity API.
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::common::serialize_secret;
use crate::error::BuilderError;

/// The authorization scope of a token.
///
/// An ID is sufficient to uniquely identify a project but if a project is
/// specified by name, then the domain of the project must also be specified in
/// order to uniquely identify the project by name. A domain scope may be
/// specified by either the domain's ID or name with equivalent results.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Project scope.
    Project(ScopeProject),
    /// Domain scope.
    Domain(Domain),
}

/// Project scope information.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into, strip_option))]
pub struct ScopeProject {
    /// Project ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project Name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

/// Domain information.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(into, strip_option))]
pub struct Domain {
    /// Domain ID.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Domain Name.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Password authentication request.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct PasswordAuth {
    /// Identity endpoint.
    pub auth_url: String,
    /// User name.
    pub username: String,
    /// User password.
    pub password: SecretString,
    /// Name of the user domain.
    #[builder(default)]
    pub user_domain_name: Option<String>,
    /// ID of the user domain.
    #[builder(default)]
    pub user_domain_id: Option<String>,
    /// Requested scope. The token is unscoped when not set.
    #[builder(default)]
    pub scope: Option<Scope>,
}

/// Owner of the token.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TokenUser {
    /// User ID.
    pub id: String,
    /// User name.
    #[serde(default)]
    pub name: String,
    /// User domain.
    #[serde(default)]
    pub domain: Domain,
}

/// Token introspection result.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TokenInfo {
    /// Token owner.
    pub user: TokenUser,
    /// Expiration time of the token.
    pub expires_at: DateTime<Utc>,
    /// Issue time of the token.
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

/// Newly issued token.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    /// Token value (the `X-Subject-Token`).
    pub token: SecretString,
    /// Token details.
    pub info: TokenInfo,
}

/// Keystone user.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct User {
    /// User ID.
    pub id: String,
    /// User name.
    pub name: String,
    /// User domain ID.
    #[builder(default)]
    #[serde(default)]
    pub domain_id: Option<String>,
    /// Default project ID.
    #[builder(default)]
    #[serde(default)]
    pub default_project_id: Option<String>,
    /// Whether the user is enabled.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// New user.
#[derive(Builder, Clone, Debug, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UserCreate {
    /// User name. Must be unique within the owning domain.
    pub name: String,
    /// Initial password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    /// Owning domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    /// Default project.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project_id: Option<String>,
    /// User description.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// User list filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct UserListParameters {
    /// Filter users by the domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    /// Filter users by the name attribute.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Keystone group.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Group {
    /// Group ID.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Group domain ID.
    #[serde(default)]
    pub domain_id: Option<String>,
}

/// Group list filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct GroupListParameters {
    /// Filter groups by the domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
}

/// Keystone role.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Role {
    /// Role ID.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Domain ID of the domain specific role.
    #[serde(default)]
    pub domain_id: Option<String>,
}

/// Role list filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RoleListParameters {
    /// Filter roles by the domain. Global roles are listed when not set.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
}

/// Keystone project.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Project domain ID.
    #[serde(default)]
    pub domain_id: Option<String>,
}

/// Project list filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct ProjectListParameters {
    /// Filter projects by the domain.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    /// Filter projects by the name attribute.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Target of the role assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum GrantTarget {
    /// Role on the project.
    Project(String),
    /// Role on the domain.
    Domain(String),
}

/// Role assignment of a user.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleGrant {
    /// Role ID.
    pub role_id: String,
    /// User ID.
    pub user_id: String,
    /// Assignment target.
    pub target: GrantTarget,
}
