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
//! # Issued credentials
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::common::serialize_secret;

/// Credentials handed to the caller.
#[derive(Clone, Debug)]
pub enum CredentialPayload {
    /// Root credentials of the cloud account as they are.
    RootPassword {
        /// Identity endpoint.
        auth_url: String,
        /// Domain of the root user.
        user_domain_name: String,
        /// Root user name.
        username: String,
        /// Root password.
        password: SecretString,
    },
    /// Scoped token.
    Token {
        /// Identity endpoint.
        auth_url: String,
        /// Ephemeral user owning the token.
        user_id: Option<String>,
        /// Token value.
        token: SecretString,
        /// Expiration time of the token.
        expires_at: DateTime<Utc>,
    },
    /// Ephemeral user.
    UserPassword {
        /// Identity endpoint.
        auth_url: String,
        /// User ID.
        user_id: String,
        /// User name.
        username: String,
        /// User password.
        password: SecretString,
        /// Domain of the user.
        domain_id: Option<String>,
        /// Default project of the user.
        default_project_id: Option<String>,
    },
    /// Current password of the static role user.
    StaticPassword {
        /// Identity endpoint.
        auth_url: String,
        /// User name.
        username: String,
        /// User password.
        password: SecretString,
        /// Domain of the user.
        user_domain_id: Option<String>,
    },
}

/// Lease of the issued credentials.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Lease {
    /// Lease duration in seconds.
    pub ttl: u64,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
}

impl Lease {
    /// Lease lasting until the given time. A moment in the past gives an
    /// empty lease.
    pub fn until(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            ttl: u64::try_from((expires_at - issued_at).num_seconds()).unwrap_or(0),
            issued_at,
        }
    }
}

/// What must be undone once the lease ends.
///
/// The descriptor carries the cloud name so that the revocation does not
/// depend on the role still being configured.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Revocation {
    /// Nothing to revoke.
    #[default]
    None,
    /// Revoke the token.
    Token {
        /// Cloud account name.
        cloud: String,
        /// Token value.
        #[serde(serialize_with = "serialize_secret")]
        token: SecretString,
    },
    /// Delete the ephemeral user.
    User {
        /// Cloud account name.
        cloud: String,
        /// User ID.
        user_id: String,
    },
    /// Revoke the token and delete the ephemeral user owning it.
    TokenAndUser {
        /// Cloud account name.
        cloud: String,
        /// Token value.
        #[serde(serialize_with = "serialize_secret")]
        token: SecretString,
        /// User ID.
        user_id: String,
    },
}

/// Result of the credential issuance.
#[derive(Clone, Debug)]
pub struct IssuedCredential {
    /// Requested role.
    pub role: String,
    /// The credentials.
    pub payload: CredentialPayload,
    /// Additional values of the role.
    pub extensions: BTreeMap<String, String>,
    /// Lease of the credentials. Root credentials are not leased.
    pub lease: Option<Lease>,
    /// Revocation descriptor.
    pub revocation: Revocation,
}

impl IssuedCredential {
    /// Data map returned to the caller.
    pub fn data(&self) -> Map<String, Value> {
        let data = match &self.payload {
            CredentialPayload::RootPassword {
                auth_url,
                user_domain_name,
                username,
                password,
            } => json!({
                "role": self.role,
                "auth_url": auth_url,
                "user_domain_name": user_domain_name,
                "username": username,
                "password": password.expose_secret(),
            }),
            CredentialPayload::Token {
                auth_url,
                user_id,
                token,
                expires_at,
            } => {
                let mut data = json!({
                    "role": self.role,
                    "auth_url": auth_url,
                    "token": token.expose_secret(),
                    "expires_at": expires_at.to_rfc3339(),
                });
                if let Some(user_id) = user_id {
                    data["user_id"] = json!(user_id);
                }
                data
            }
            CredentialPayload::UserPassword {
                auth_url,
                user_id,
                username,
                password,
                domain_id,
                default_project_id,
            } => json!({
                "role": self.role,
                "auth_url": auth_url,
                "user_id": user_id,
                "username": username,
                "password": password.expose_secret(),
                "domain_id": domain_id,
                "default_project_id": default_project_id,
            }),
            CredentialPayload::StaticPassword {
                auth_url,
                username,
                password,
                user_domain_id,
            } => json!({
                "role": self.role,
                "auth_url": auth_url,
                "username": username,
                "password": password.expose_secret(),
                "user_domain_id": user_domain_id,
            }),
        };
        let mut data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, val) in &self.extensions {
            data.insert(key.clone(), Value::String(val.clone()));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn test_lease_until() {
        let now = Utc::now();
        assert_eq!(600, Lease::until(now, now + TimeDelta::seconds(600)).ttl);
        assert_eq!(0, Lease::until(now, now - TimeDelta::seconds(5)).ttl);
    }

    #[test]
    fn test_user_password_data() {
        let sot = IssuedCredential {
            role: "r1".into(),
            payload: CredentialPayload::UserPassword {
                auth_url: "http://keystone:5000/v3".into(),
                user_id: "uid".into(),
                username: "osuserabc".into(),
                password: "pw".into(),
                domain_id: Some("default".into()),
                default_project_id: None,
            },
            extensions: BTreeMap::from([("region".to_string(), "r1".to_string())]),
            lease: None,
            revocation: Revocation::None,
        };
        let data = sot.data();
        assert_eq!(
            json!({
                "role": "r1",
                "auth_url": "http://keystone:5000/v3",
                "user_id": "uid",
                "username": "osuserabc",
                "password": "pw",
                "domain_id": "default",
                "default_project_id": null,
                "region": "r1",
            }),
            Value::Object(data)
        );
    }

    #[test]
    fn test_token_data_without_user() {
        let expires_at = Utc::now();
        let sot = IssuedCredential {
            role: "r1".into(),
            payload: CredentialPayload::Token {
                auth_url: "http://keystone:5000/v3".into(),
                user_id: None,
                token: "tok".into(),
                expires_at,
            },
            extensions: BTreeMap::new(),
            lease: None,
            revocation: Revocation::None,
        };
        let data = sot.data();
        assert_eq!(Some(&json!("tok")), data.get("token"));
        assert_eq!(Some(&json!(expires_at.to_rfc3339())), data.get("expires_at"));
        assert!(!data.contains_key("user_id"));
    }

    #[test]
    fn test_revocation_serde() {
        let sot = Revocation::TokenAndUser {
            cloud: "c1".into(),
            token: "tok".into(),
            user_id: "uid".into(),
        };
        let val = serde_json::to_value(&sot).unwrap();
        assert_eq!(
            json!({"action": "token_and_user", "cloud": "c1", "token": "tok", "user_id": "uid"}),
            val
        );
        match serde_json::from_value::<Revocation>(val).unwrap() {
            Revocation::TokenAndUser { token, .. } => assert_eq!("tok", token.expose_secret()),
            other => panic!("unexpected revocation {other:?}"),
        }
        assert_eq!(
            json!({"action": "none"}),
            serde_json::to_value(Revocation::default()).unwrap()
        );
    }
}
