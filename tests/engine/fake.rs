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
//! In-memory identity service used by the engine tests.
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

use openstack_secrets::client::types::*;
use openstack_secrets::client::{ClientError, IdentityClient, IdentityConnector};

pub const AUTH_URL: &str = "http://keystone.test/v3";
pub const TOKEN_LIFETIME: i64 = 1800;

#[derive(Clone, Debug)]
pub struct FakeUser {
    pub user: User,
    pub password: String,
}

#[derive(Default)]
pub struct Inner {
    pub users: BTreeMap<String, FakeUser>,
    /// Token value to the user ID.
    pub tokens: HashMap<String, String>,
    pub groups: Vec<Group>,
    pub roles: Vec<Role>,
    pub projects: Vec<Project>,
    pub memberships: Vec<(String, String)>,
    pub grants: Vec<RoleGrant>,
    next_id: usize,
}

impl Inner {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn add_user(&mut self, id: &str, name: &str, password: &str) {
        self.users.insert(
            id.into(),
            FakeUser {
                user: User {
                    id: id.into(),
                    name: name.into(),
                    domain_id: Some("default".into()),
                    default_project_id: None,
                    enabled: true,
                },
                password: password.into(),
            },
        );
    }

    fn drop_tokens_of(&mut self, user_id: &str) {
        self.tokens.retain(|_, owner| owner != user_id);
    }
}

/// Keystone keeping users, tokens and assignments in memory.
#[derive(Default)]
pub struct FakeKeystone {
    inner: Mutex<Inner>,
    /// Number of the connector authentications.
    pub connects: AtomicUsize,
    /// Number of the successful password changes.
    pub password_changes: AtomicUsize,
}

impl FakeKeystone {
    /// Keystone with the `admin` (password `p0`) and `svc` users.
    pub fn new() -> Arc<Self> {
        let keystone = Self::default();
        {
            let mut inner = keystone.state();
            inner.add_user("admin-id", "admin", "p0");
            inner.add_user("svc-id", "svc", "initial");
            inner.groups.push(Group {
                id: "gid".into(),
                name: "devs".into(),
                domain_id: Some("default".into()),
            });
            inner.roles.push(Role {
                id: "rid".into(),
                name: "member".into(),
                domain_id: None,
            });
            inner.projects.push(Project {
                id: "p1".into(),
                name: "demo".into(),
                domain_id: Some("default".into()),
            });
        }
        Arc::new(keystone)
    }

    pub fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn password_of(&self, user_id: &str) -> Option<String> {
        self.state().users.get(user_id).map(|x| x.password.clone())
    }

    fn authenticate(&self, auth: &PasswordAuth) -> Result<IssuedToken, ClientError> {
        let domain_id = match (&auth.user_domain_id, &auth.user_domain_name) {
            (Some(id), _) => id.clone(),
            (None, Some(name)) if name == "Default" => "default".to_string(),
            (None, Some(name)) => name.to_lowercase(),
            (None, None) => "default".to_string(),
        };
        let mut inner = self.state();
        let user = inner
            .users
            .values()
            .find(|x| {
                x.user.name == auth.username
                    && x.user.domain_id.as_deref() == Some(domain_id.as_str())
                    && x.password == auth.password.expose_secret()
            })
            .map(|x| x.user.clone())
            .ok_or_else(|| ClientError::Unauthorized("invalid credentials".into()))?;
        let token = inner.next("tok");
        inner.tokens.insert(token.clone(), user.id.clone());
        let now = Utc::now();
        Ok(IssuedToken {
            token: SecretString::from(token),
            info: TokenInfo {
                user: TokenUser {
                    id: user.id,
                    name: user.name,
                    domain: Domain {
                        id: Some(domain_id),
                        name: Some("Default".into()),
                    },
                },
                expires_at: now + TimeDelta::seconds(TOKEN_LIFETIME),
                issued_at: Some(now),
            },
        })
    }
}

/// Connector authenticating against the fake identity service.
pub struct FakeConnector(pub Arc<FakeKeystone>);

#[async_trait]
impl IdentityConnector for FakeConnector {
    async fn connect(&self, auth: &PasswordAuth) -> Result<Arc<dyn IdentityClient>, ClientError> {
        let issued = self.0.authenticate(auth)?;
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeClient {
            keystone: self.0.clone(),
            token: issued.token.expose_secret().to_string(),
            info: issued.info,
        }))
    }
}

/// Client bound to a session token of the fake identity service.
pub struct FakeClient {
    keystone: Arc<FakeKeystone>,
    token: String,
    info: TokenInfo,
}

impl FakeClient {
    fn check(&self) -> Result<MutexGuard<'_, Inner>, ClientError> {
        let inner = self.keystone.state();
        if !inner.tokens.contains_key(&self.token) {
            return Err(ClientError::Unauthorized("the session token is revoked".into()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl IdentityClient for FakeClient {
    fn auth_url(&self) -> String {
        AUTH_URL.into()
    }

    fn expires_at(&self) -> DateTime<Utc> {
        self.info.expires_at
    }

    async fn token_info(&self) -> Result<TokenInfo, ClientError> {
        drop(self.check()?);
        Ok(self.info.clone())
    }

    async fn issue_token(&self, auth: &PasswordAuth) -> Result<IssuedToken, ClientError> {
        self.keystone.authenticate(auth)
    }

    async fn revoke_token(&self, token: &SecretString) -> Result<(), ClientError> {
        let mut inner = self.check()?;
        inner
            .tokens
            .remove(token.expose_secret())
            .map(|_| ())
            .ok_or_else(|| ClientError::NotFound("token".into()))
    }

    async fn create_user(&self, user: &UserCreate) -> Result<User, ClientError> {
        let mut inner = self.check()?;
        if inner
            .users
            .values()
            .any(|x| x.user.name == user.name && x.user.domain_id == user.domain_id)
        {
            return Err(ClientError::Conflict(user.name.clone()));
        }
        let id = inner.next("user");
        let created = User {
            id: id.clone(),
            name: user.name.clone(),
            domain_id: user.domain_id.clone(),
            default_project_id: user.default_project_id.clone(),
            enabled: true,
        };
        inner.users.insert(
            id,
            FakeUser {
                user: created.clone(),
                password: user.password.expose_secret().to_string(),
            },
        );
        Ok(created)
    }

    async fn delete_user<'a>(&self, user_id: &'a str) -> Result<(), ClientError> {
        let mut inner = self.check()?;
        inner
            .users
            .remove(user_id)
            .ok_or_else(|| ClientError::NotFound(user_id.into()))?;
        inner.drop_tokens_of(user_id);
        Ok(())
    }

    async fn list_users(&self, params: &UserListParameters) -> Result<Vec<User>, ClientError> {
        let inner = self.check()?;
        Ok(inner
            .users
            .values()
            .filter(|x| params.name.as_ref().is_none_or(|name| *name == x.user.name))
            .filter(|x| params.domain_id.is_none() || params.domain_id == x.user.domain_id)
            .map(|x| x.user.clone())
            .collect())
    }

    async fn change_password<'a>(
        &self,
        user_id: &'a str,
        original_password: &SecretString,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        // let a concurrent caller run
        tokio::task::yield_now().await;
        let mut inner = self.check()?;
        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| ClientError::NotFound(user_id.into()))?;
        if user.password != original_password.expose_secret() {
            return Err(ClientError::Unauthorized("original password does not match".into()));
        }
        user.password = password.expose_secret().to_string();
        inner.drop_tokens_of(user_id);
        self.keystone.password_changes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reset_password<'a>(
        &self,
        user_id: &'a str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let mut inner = self.check()?;
        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| ClientError::NotFound(user_id.into()))?;
        user.password = password.expose_secret().to_string();
        inner.drop_tokens_of(user_id);
        Ok(())
    }

    async fn list_groups(&self, params: &GroupListParameters) -> Result<Vec<Group>, ClientError> {
        let inner = self.check()?;
        Ok(inner
            .groups
            .iter()
            .filter(|x| params.domain_id.is_none() || params.domain_id == x.domain_id)
            .cloned()
            .collect())
    }

    async fn list_roles(&self, _params: &RoleListParameters) -> Result<Vec<Role>, ClientError> {
        Ok(self.check()?.roles.clone())
    }

    async fn list_projects(
        &self,
        params: &ProjectListParameters,
    ) -> Result<Vec<Project>, ClientError> {
        let inner = self.check()?;
        Ok(inner
            .projects
            .iter()
            .filter(|x| params.name.as_ref().is_none_or(|name| *name == x.name))
            .filter(|x| params.domain_id.is_none() || params.domain_id == x.domain_id)
            .cloned()
            .collect())
    }

    async fn add_user_to_group<'a>(
        &self,
        group_id: &'a str,
        user_id: &'a str,
    ) -> Result<(), ClientError> {
        let mut inner = self.check()?;
        inner.memberships.push((group_id.into(), user_id.into()));
        Ok(())
    }

    async fn grant_role(&self, grant: &RoleGrant) -> Result<(), ClientError> {
        let mut inner = self.check()?;
        inner.grants.push(grant.clone());
        Ok(())
    }
}
