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
//! # Keystone HTTP client
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::types::*;
use super::{ClientError, IdentityClient, IdentityConnector};
use crate::config::ClientSection;

const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Normalize the configured authentication URL to the Keystone v3 endpoint.
///
/// `https://keystone:5000`, `https://keystone:5000/` and
/// `https://keystone:5000/v3/` all result in `https://keystone:5000/v3`.
pub fn identity_endpoint(auth_url: &str) -> Result<String, ClientError> {
    let url = Url::parse(auth_url).map_err(|source| ClientError::InvalidUrl {
        url: auth_url.to_string(),
        source,
    })?;
    let base = url.as_str().trim_end_matches('/');
    if base.ends_with("/v3") {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}/v3"))
    }
}

/// Keystone connector.
#[derive(Clone, Debug)]
pub struct KeystoneConnector {
    /// Reqwest client shared by all the cloud sessions.
    http: Arc<Client>,
}

impl KeystoneConnector {
    pub fn new(config: &ClientSection) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .gzip(true)
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(Duration::from_secs(timeout));
        }
        Ok(Self {
            http: Arc::new(builder.build()?),
        })
    }
}

#[async_trait]
impl IdentityConnector for KeystoneConnector {
    #[tracing::instrument(level = "debug", skip(self, auth), fields(auth_url = %auth.auth_url, username = %auth.username))]
    async fn connect(&self, auth: &PasswordAuth) -> Result<Arc<dyn IdentityClient>, ClientError> {
        let endpoint = identity_endpoint(&auth.auth_url)?;
        let issued = authenticate(&self.http, &endpoint, auth).await?;
        debug!("authenticated as user {}", issued.info.user.id);
        Ok(Arc::new(KeystoneClient {
            http: self.http.clone(),
            endpoint,
            token: issued.token,
            info: issued.info,
        }))
    }
}

/// Client bound to an authenticated Keystone session.
#[derive(Debug)]
pub struct KeystoneClient {
    http: Arc<Client>,
    /// Identity v3 endpoint.
    endpoint: String,
    /// Session token.
    token: SecretString,
    /// Session token details.
    info: TokenInfo,
}

impl KeystoneClient {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.endpoint, path))
            .header(AUTH_TOKEN_HEADER, self.token.expose_secret())
    }
}

/// Fail on the unsuccessful response.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::from_status(status, message))
}

async fn authenticate(
    http: &Client,
    endpoint: &str,
    auth: &PasswordAuth,
) -> Result<IssuedToken, ClientError> {
    let response = http
        .post(format!("{endpoint}/auth/tokens"))
        .json(&AuthRequest::from(auth))
        .send()
        .await?;
    let response = check(response).await?;
    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|val| val.to_str().ok())
        .map(SecretString::from)
        .ok_or(ClientError::MissingSubjectToken)?;
    let body: TokenResponse = response.json().await?;
    Ok(IssuedToken {
        token,
        info: body.token,
    })
}

#[async_trait]
impl IdentityClient for KeystoneClient {
    fn auth_url(&self) -> String {
        self.endpoint.clone()
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.info.expires_at
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn token_info(&self) -> Result<TokenInfo, ClientError> {
        let response = self
            .request(Method::GET, "auth/tokens")
            .header(SUBJECT_TOKEN_HEADER, self.token.expose_secret())
            .send()
            .await?;
        let body: TokenResponse = check(response).await?.json().await?;
        Ok(body.token)
    }

    #[tracing::instrument(level = "debug", skip(self, auth), fields(username = %auth.username))]
    async fn issue_token(&self, auth: &PasswordAuth) -> Result<IssuedToken, ClientError> {
        authenticate(&self.http, &self.endpoint, auth).await
    }

    #[tracing::instrument(level = "debug", skip(self, token))]
    async fn revoke_token(&self, token: &SecretString) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, "auth/tokens")
            .header(SUBJECT_TOKEN_HEADER, token.expose_secret())
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, user), fields(name = %user.name))]
    async fn create_user(&self, user: &UserCreate) -> Result<User, ClientError> {
        let response = self
            .request(Method::POST, "users")
            .json(&UserCreateRequest { user })
            .send()
            .await?;
        let body: UserResponse = check(response).await?.json().await?;
        Ok(body.user)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_user<'a>(&self, user_id: &'a str) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("users/{user_id}"))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_users(&self, params: &UserListParameters) -> Result<Vec<User>, ClientError> {
        let response = self
            .request(Method::GET, "users")
            .query(params)
            .send()
            .await?;
        let body: UsersResponse = check(response).await?.json().await?;
        Ok(body.users)
    }

    #[tracing::instrument(level = "debug", skip(self, original_password, password))]
    async fn change_password<'a>(
        &self,
        user_id: &'a str,
        original_password: &SecretString,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, &format!("users/{user_id}/password"))
            .json(&PasswordChangeRequest {
                user: PasswordChange {
                    password: password.expose_secret(),
                    original_password: Some(original_password.expose_secret()),
                },
            })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, password))]
    async fn reset_password<'a>(
        &self,
        user_id: &'a str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::PATCH, &format!("users/{user_id}"))
            .json(&PasswordChangeRequest {
                user: PasswordChange {
                    password: password.expose_secret(),
                    original_password: None,
                },
            })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_groups(&self, params: &GroupListParameters) -> Result<Vec<Group>, ClientError> {
        let response = self
            .request(Method::GET, "groups")
            .query(params)
            .send()
            .await?;
        let body: GroupsResponse = check(response).await?.json().await?;
        Ok(body.groups)
    }

    async fn list_roles(&self, params: &RoleListParameters) -> Result<Vec<Role>, ClientError> {
        let response = self
            .request(Method::GET, "roles")
            .query(params)
            .send()
            .await?;
        let body: RolesResponse = check(response).await?.json().await?;
        Ok(body.roles)
    }

    async fn list_projects(
        &self,
        params: &ProjectListParameters,
    ) -> Result<Vec<Project>, ClientError> {
        let response = self
            .request(Method::GET, "projects")
            .query(params)
            .send()
            .await?;
        let body: ProjectsResponse = check(response).await?.json().await?;
        Ok(body.projects)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn add_user_to_group<'a>(
        &self,
        group_id: &'a str,
        user_id: &'a str,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::PUT, &format!("groups/{group_id}/users/{user_id}"))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn grant_role(&self, grant: &RoleGrant) -> Result<(), ClientError> {
        let path = match &grant.target {
            GrantTarget::Project(id) => {
                format!("projects/{id}/users/{}/roles/{}", grant.user_id, grant.role_id)
            }
            GrantTarget::Domain(id) => {
                format!("domains/{id}/users/{}/roles/{}", grant.user_id, grant.role_id)
            }
        };
        let response = self.request(Method::PUT, &path).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Serialize)]
struct AuthBody<'a> {
    identity: AuthIdentity<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a Scope>,
}

#[derive(Serialize)]
struct AuthIdentity<'a> {
    methods: [&'static str; 1],
    password: PasswordMethod<'a>,
}

#[derive(Serialize)]
struct PasswordMethod<'a> {
    user: PasswordUser<'a>,
}

#[derive(Serialize)]
struct PasswordUser<'a> {
    name: &'a str,
    password: &'a str,
    domain: Domain,
}

impl<'a> From<&'a PasswordAuth> for AuthRequest<'a> {
    fn from(value: &'a PasswordAuth) -> Self {
        Self {
            auth: AuthBody {
                identity: AuthIdentity {
                    methods: ["password"],
                    password: PasswordMethod {
                        user: PasswordUser {
                            name: &value.username,
                            password: value.password.expose_secret(),
                            domain: Domain {
                                id: value.user_domain_id.clone(),
                                name: value.user_domain_name.clone(),
                            },
                        },
                    },
                },
                scope: value.scope.as_ref(),
            },
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: TokenInfo,
}

#[derive(Serialize)]
struct UserCreateRequest<'a> {
    user: &'a UserCreate,
}

#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Serialize)]
struct PasswordChangeRequest<'a> {
    user: PasswordChange<'a>,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_password: Option<&'a str>,
}

#[derive(Deserialize)]
struct GroupsResponse {
    groups: Vec<Group>,
}

#[derive(Deserialize)]
struct RolesResponse {
    roles: Vec<Role>,
}

#[derive(Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
}
