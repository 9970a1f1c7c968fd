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
use chrono::Utc;
use eyre::Report;
use secrecy::ExposeSecret;

use openstack_secrets::client::types::{GrantTarget, RoleGrant};
use openstack_secrets::credential::CredentialApi;
use openstack_secrets::credential::types::{CredentialPayload, Revocation};
use openstack_secrets::role::RoleApi;
use openstack_secrets::role::types::{DynamicRoleCreateBuilder, RoleScopeBuilder, SecretType};

use super::fake::TOKEN_LIFETIME;
use super::setup;

#[tokio::test]
async fn test_ephemeral_password() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    state
        .provider
        .get_role_provider()
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("r1")
                .cloud("c1")
                .ttl(3600u64)
                .secret_type(SecretType::Password)
                .build()?,
        )
        .await?;

    let issued = state
        .provider
        .get_credential_provider()
        .issue(&state, "r1")
        .await?;
    let data = issued.data();
    for key in [
        "auth_url",
        "user_id",
        "username",
        "password",
        "domain_id",
        "default_project_id",
    ] {
        assert!(data.contains_key(key), "{key} is missing");
    }
    assert_eq!(Some("default"), data["domain_id"].as_str());
    assert_eq!(3600, issued.lease.as_ref().map(|x| x.ttl).unwrap_or_default());

    let CredentialPayload::UserPassword {
        user_id,
        username,
        password,
        ..
    } = &issued.payload
    else {
        panic!("unexpected payload {:?}", issued.payload);
    };
    assert!(username.starts_with("osuser"));
    assert_eq!(
        Some(password.expose_secret().to_string()),
        keystone.password_of(user_id)
    );

    state
        .provider
        .get_credential_provider()
        .revoke(&state, &issued.revocation)
        .await?;
    assert!(keystone.password_of(user_id).is_none());
    // a repeated revocation finds nothing to delete
    state
        .provider
        .get_credential_provider()
        .revoke(&state, &issued.revocation)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_root_token() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    state
        .provider
        .get_role_provider()
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("root")
                .cloud("c1")
                .root(true)
                .build()?,
        )
        .await?;

    let issued = state
        .provider
        .get_credential_provider()
        .issue(&state, "root")
        .await?;
    let ttl = issued.lease.as_ref().map(|x| x.ttl).unwrap_or_default();
    assert!((TOKEN_LIFETIME as u64 - 10..=TOKEN_LIFETIME as u64).contains(&ttl));
    assert!(!issued.data().contains_key("user_id"));

    let Revocation::Token { token, .. } = &issued.revocation else {
        panic!("unexpected revocation {:?}", issued.revocation);
    };
    assert_eq!(
        Some(&"admin-id".to_string()),
        keystone.state().tokens.get(token.expose_secret())
    );
    state
        .provider
        .get_credential_provider()
        .revoke(&state, &issued.revocation)
        .await?;
    assert!(!keystone.state().tokens.contains_key(token.expose_secret()));
    Ok(())
}

#[tokio::test]
async fn test_ephemeral_token_with_assignments() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    state
        .provider
        .get_role_provider()
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("dev")
                .cloud("c1")
                .user_groups(vec!["devs".to_string()])
                .user_roles(vec!["member".to_string()])
                .scope(RoleScopeBuilder::default().project_name("demo").build()?)
                .build()?,
        )
        .await?;

    let issued = state
        .provider
        .get_credential_provider()
        .issue(&state, "dev")
        .await?;
    let Revocation::TokenAndUser { token, user_id, .. } = &issued.revocation else {
        panic!("unexpected revocation {:?}", issued.revocation);
    };
    assert_eq!(Some(user_id.as_str()), issued.data()["user_id"].as_str());
    assert!(issued.lease.as_ref().is_some_and(|x| x.issued_at <= Utc::now()));
    {
        let inner = keystone.state();
        assert_eq!(
            Some(Some("p1".to_string())),
            inner.users.get(user_id).map(|x| x.user.default_project_id.clone())
        );
        assert!(inner.memberships.contains(&("gid".to_string(), user_id.clone())));
        assert!(inner.grants.contains(&RoleGrant {
            role_id: "rid".into(),
            user_id: user_id.clone(),
            target: GrantTarget::Project("p1".into()),
        }));
        assert_eq!(Some(user_id), inner.tokens.get(token.expose_secret()));
    }

    state
        .provider
        .get_credential_provider()
        .revoke(&state, &issued.revocation)
        .await?;
    let inner = keystone.state();
    assert!(!inner.users.contains_key(user_id));
    assert!(!inner.tokens.contains_key(token.expose_secret()));
    Ok(())
}

#[tokio::test]
async fn test_unknown_role() -> Result<(), Report> {
    let (_keystone, state) = setup().await?;
    let err = state
        .provider
        .get_credential_provider()
        .issue(&state, "missing")
        .await
        .unwrap_err();
    assert_eq!("role `missing` not found", err.to_string());
    Ok(())
}
