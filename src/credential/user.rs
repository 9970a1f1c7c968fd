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
//! # Ephemeral users
//!
//! Users backing the credentials of the non root dynamic roles. The user is
//! created in the domain of the root user, added to the groups of the role and
//! granted the roles of the role on its project (or domain). When any of the
//! steps fails the user is deleted again.
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::client::IdentityClient;
use crate::client::types::*;
use crate::cloud::CloudApi;
use crate::cloud::template::{TemplateContext, UsernameTemplate};
use crate::cloud::types::CloudAccount;
use crate::credential::CredentialProviderError;
use crate::engine::EngineState;
use crate::role::types::DynamicRole;
use crate::role::validation::{resolve_groups, resolve_roles};

/// Number of the attempts to find a free user name.
pub const USERNAME_ATTEMPTS: usize = 3;

/// Created ephemeral user.
#[derive(Clone, Debug)]
pub struct EphemeralUser {
    /// The user.
    pub user: User,
    /// Password of the user.
    pub password: SecretString,
}

/// Resolve the default project of the ephemeral user.
async fn default_project(
    client: &dyn IdentityClient,
    account: &CloudAccount,
    role: &DynamicRole,
    user_domain_id: Option<&str>,
) -> Result<Option<String>, CredentialProviderError> {
    if let Some(id) = &role.scope.project_id {
        return Ok(Some(id.clone()));
    }
    let Some(name) = &role.scope.project_name else {
        return Ok(None);
    };
    let domain_id = match (&role.scope.domain_id, &role.scope.domain_name) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(_)) => None,
        (None, None) => user_domain_id.map(Into::into),
    };
    let params = ProjectListParameters {
        domain_id,
        name: Some(name.clone()),
    };
    client
        .list_projects(&params)
        .await?
        .into_iter()
        .find(|project| &project.name == name)
        .map(|project| Some(project.id))
        .ok_or_else(|| CredentialProviderError::ProjectNotFound {
            name: name.clone(),
            cloud: account.name.clone(),
        })
}

/// Create the user picking a free name.
async fn create_user(
    client: &dyn IdentityClient,
    template: &UsernameTemplate,
    role: &DynamicRole,
    password: &SecretString,
    domain_id: Option<&str>,
    default_project_id: Option<&str>,
) -> Result<User, CredentialProviderError> {
    for attempt in 1..=USERNAME_ATTEMPTS {
        let name = template.render(TemplateContext {
            role_name: &role.name,
            cloud: &role.cloud,
        });
        let user = UserCreate {
            name,
            password: password.clone(),
            domain_id: domain_id.map(Into::into),
            default_project_id: default_project_id.map(Into::into),
            description: Some(format!("ephemeral user of the role {}", role.name)),
        };
        match client.create_user(&user).await {
            Ok(user) => return Ok(user),
            Err(err) if err.is_conflict() => {
                debug!(
                    "user name {} is taken, attempt {} of {}",
                    user.name, attempt, USERNAME_ATTEMPTS
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(CredentialProviderError::UsernameExhausted {
        role: role.name.clone(),
        attempts: USERNAME_ATTEMPTS,
    })
}

/// Add the user to the groups and grant the roles of the role.
async fn assign(
    client: &dyn IdentityClient,
    account: &CloudAccount,
    role: &DynamicRole,
    user: &User,
    domain_id: Option<&str>,
    project_id: Option<&str>,
) -> Result<(), CredentialProviderError> {
    for group in resolve_groups(client, &account.name, domain_id, &role.user_groups).await? {
        client.add_user_to_group(&group.id, &user.id).await?;
    }

    let roles = resolve_roles(client, &account.name, &role.user_roles).await?;
    if roles.is_empty() {
        return Ok(());
    }
    let target = match (project_id, &role.scope.domain_id, domain_id) {
        (Some(id), _, _) => GrantTarget::Project(id.to_string()),
        (None, Some(id), _) => GrantTarget::Domain(id.clone()),
        (None, None, Some(id)) => GrantTarget::Domain(id.to_string()),
        (None, None, None) => {
            return Err(CredentialProviderError::NoGrantTarget(role.name.clone()));
        }
    };
    for granted in roles {
        client
            .grant_role(&RoleGrant {
                role_id: granted.id,
                user_id: user.id.clone(),
                target: target.clone(),
            })
            .await?;
    }
    Ok(())
}

/// Delete the user and keep the original error.
pub async fn discard(
    client: &dyn IdentityClient,
    user_id: &str,
    err: CredentialProviderError,
) -> CredentialProviderError {
    if let Err(delete_err) = client.delete_user(user_id).await {
        warn!(
            "ephemeral user {} could not be deleted after a failed issuance: {}",
            user_id, delete_err
        );
    }
    err
}

/// Create the ephemeral user of the role.
pub async fn provision(
    state: &EngineState,
    client: &dyn IdentityClient,
    account: &CloudAccount,
    role: &DynamicRole,
) -> Result<EphemeralUser, CredentialProviderError> {
    let template = UsernameTemplate::parse(
        account
            .username_template
            .as_deref()
            .unwrap_or(&state.config.cloud.username_template),
    )?;
    let domain_id = client.token_info().await?.user.domain.id;
    let default_project_id = default_project(client, account, role, domain_id.as_deref()).await?;
    let password = state
        .provider
        .get_cloud_provider()
        .generate_password(state, &account.name)
        .await?;

    let user = create_user(
        client,
        &template,
        role,
        &password,
        domain_id.as_deref(),
        default_project_id.as_deref(),
    )
    .await?;
    debug!("created ephemeral user {} for the role {}", user.id, role.name);

    if let Err(err) = assign(
        client,
        account,
        role,
        &user,
        domain_id.as_deref(),
        default_project_id.as_deref(),
    )
    .await
    {
        return Err(discard(client, &user.id, err).await);
    }
    Ok(EphemeralUser { user, password })
}
