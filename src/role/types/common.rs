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
use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::client::types::{Domain, Scope, ScopeProject};
use crate::error::BuilderError;

/// Kind of the secret handed out for the role.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    /// Scoped token.
    #[default]
    Token,
    /// User name and password.
    Password,
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// Project and domain scoping of the role.
///
/// Empty values are equivalent to unset ones.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RoleScope {
    /// Project ID.
    #[builder(default)]
    #[serde(default)]
    pub project_id: Option<String>,
    /// Project name, resolved within the domain of the role.
    #[builder(default)]
    #[serde(default)]
    pub project_name: Option<String>,
    /// Domain ID.
    #[builder(default)]
    #[serde(default)]
    pub domain_id: Option<String>,
    /// Domain name.
    #[builder(default)]
    #[serde(default)]
    pub domain_name: Option<String>,
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.filter(|x| !x.is_empty())
}

impl RoleScope {
    /// Drop the empty values.
    pub fn normalized(self) -> Self {
        Self {
            project_id: non_empty(self.project_id),
            project_name: non_empty(self.project_name),
            domain_id: non_empty(self.domain_id),
            domain_name: non_empty(self.domain_name),
        }
    }

    /// Apply the values set in the update. An empty value unsets the field.
    pub fn merge(&mut self, update: RoleScope) {
        if let Some(val) = update.project_id {
            self.project_id = non_empty(Some(val));
        }
        if let Some(val) = update.project_name {
            self.project_name = non_empty(Some(val));
        }
        if let Some(val) = update.domain_id {
            self.domain_id = non_empty(Some(val));
        }
        if let Some(val) = update.domain_name {
            self.domain_name = non_empty(Some(val));
        }
    }

    /// Domain the project name is resolved in. Also the scope of the tokens
    /// of the roles without a project.
    pub fn project_domain(&self, default_domain_name: &str) -> Domain {
        match (&self.domain_id, &self.domain_name) {
            (Some(id), _) => Domain {
                id: Some(id.clone()),
                name: None,
            },
            (None, Some(name)) => Domain {
                id: None,
                name: Some(name.clone()),
            },
            (None, None) => Domain {
                id: None,
                name: Some(default_domain_name.to_string()),
            },
        }
    }

    /// Authorization scope of the tokens issued for the role.
    ///
    /// The project ID wins over the project name, a project wins over a
    /// domain. Without any scoping field the token is scoped to the default
    /// domain.
    pub fn token_scope(&self, default_domain_name: &str) -> Scope {
        if let Some(id) = &self.project_id {
            return Scope::Project(ScopeProject {
                id: Some(id.clone()),
                name: None,
                domain: None,
            });
        }
        if let Some(name) = &self.project_name {
            return Scope::Project(ScopeProject {
                id: None,
                name: Some(name.clone()),
                domain: Some(self.project_domain(default_domain_name)),
            });
        }
        Scope::Domain(self.project_domain(default_domain_name))
    }
}

/// Role list filters.
#[derive(Builder, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RoleListParameters {
    /// Only list roles of the cloud account.
    #[builder(default)]
    pub cloud: Option<String>,
}
