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
//! # Role validation
//!
//! Root roles hand out the root identity of the cloud as is, so none of the
//! settings describing the ephemeral users apply to them. Groups and roles
//! given for the ephemeral users must exist at the identity service.
use crate::client::IdentityClient;
use crate::client::types::{Group, GroupListParameters, Role, RoleListParameters};
use crate::role::{RoleProviderError, types::*};

/// Reject the root role carrying settings of the ephemeral users.
pub fn check_root_role(role: &DynamicRole) -> Result<(), RoleProviderError> {
    if !role.root {
        return Ok(());
    }
    if role.ttl.is_some() {
        return Err(RoleProviderError::RootIncompatible("ttl"));
    }
    if role.secret_type == SecretType::Password {
        return Err(RoleProviderError::RootIncompatible("password secret type"));
    }
    if !role.user_groups.is_empty() {
        return Err(RoleProviderError::RootIncompatible("user_groups"));
    }
    if !role.user_roles.is_empty() {
        return Err(RoleProviderError::RootIncompatible("user_roles"));
    }
    Ok(())
}

/// Pick the entities with the requested names preserving the requested order.
fn select<T, F>(
    kind: &'static str,
    cloud: &str,
    names: &[String],
    available: Vec<T>,
    name_of: F,
) -> Result<Vec<T>, RoleProviderError>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut selected = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match available.iter().find(|x| name_of(x) == name) {
            Some(entity) => selected.push(entity.clone()),
            None => missing.push(name.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(RoleProviderError::UnknownEntities {
            kind,
            cloud: cloud.to_string(),
            names: missing.join(", "),
        });
    }
    Ok(selected)
}

/// Resolve the group names within the domain.
pub async fn resolve_groups(
    client: &dyn IdentityClient,
    cloud: &str,
    domain_id: Option<&str>,
    names: &[String],
) -> Result<Vec<Group>, RoleProviderError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let params = GroupListParameters {
        domain_id: domain_id.map(Into::into),
    };
    let groups = client.list_groups(&params).await?;
    select("groups", cloud, names, groups, |x| x.name.as_str())
}

/// Resolve the role names.
pub async fn resolve_roles(
    client: &dyn IdentityClient,
    cloud: &str,
    names: &[String],
) -> Result<Vec<Role>, RoleProviderError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let roles = client.list_roles(&RoleListParameters::default()).await?;
    select("roles", cloud, names, roles, |x| x.name.as_str())
}
