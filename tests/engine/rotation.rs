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
use std::sync::atomic::Ordering;

use chrono::{TimeDelta, Utc};
use eyre::Report;
use secrecy::{ExposeSecret, SecretString};

use openstack_secrets::client::IdentityConnector;
use openstack_secrets::client::types::PasswordAuthBuilder;
use openstack_secrets::cloud::CloudApi;
use openstack_secrets::role::RoleApi;
use openstack_secrets::role::types::StaticRoleCreateBuilder;
use openstack_secrets::rotation::RotationApi;

use super::fake::{AUTH_URL, FakeConnector};
use super::setup;

#[tokio::test]
async fn test_root_rotation() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    let cloud_provider = state.provider.get_cloud_provider();
    cloud_provider.get_client(&state, "c1").await?;

    state
        .provider
        .get_rotation_provider()
        .rotate_root(&state, "c1")
        .await?;

    let account = cloud_provider.get_cloud(&state, "c1").await?.unwrap();
    let current = account.password.expose_secret().to_string();
    assert_ne!("p0", current);
    assert_eq!(Some(current.clone()), keystone.password_of("admin-id"));
    assert!(
        account
            .root_password_expires_at
            .is_some_and(|x| x > Utc::now() + TimeDelta::days(29))
    );

    // the old password is gone
    let connector = FakeConnector(keystone.clone());
    let old = PasswordAuthBuilder::default()
        .auth_url(AUTH_URL)
        .username("admin")
        .password(SecretString::from("p0"))
        .user_domain_name("Default")
        .build()?;
    assert!(connector.connect(&old).await.is_err());

    // the client is authenticated again with the new password
    let connects = keystone.connects.load(Ordering::SeqCst);
    let client = cloud_provider.get_client(&state, "c1").await?;
    client.token_info().await?;
    assert_eq!(connects + 1, keystone.connects.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_root_rotations() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    state.provider.get_cloud_provider().get_client(&state, "c1").await?;
    let connects = keystone.connects.load(Ordering::SeqCst);

    let first = tokio::spawn({
        let state = state.clone();
        async move {
            state
                .provider
                .get_rotation_provider()
                .rotate_root(&state, "c1")
                .await
        }
    });
    let second = tokio::spawn({
        let state = state.clone();
        async move {
            state
                .provider
                .get_rotation_provider()
                .rotate_root(&state, "c1")
                .await
        }
    });
    first.await??;
    second.await??;

    assert_eq!(2, keystone.password_changes.load(Ordering::SeqCst));
    let account = state
        .provider
        .get_cloud_provider()
        .get_cloud(&state, "c1")
        .await?
        .unwrap();
    assert_eq!(
        Some(account.password.expose_secret().to_string()),
        keystone.password_of("admin-id")
    );
    // only the second rotation had to authenticate again
    assert_eq!(connects + 1, keystone.connects.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn test_static_role_user_id_is_stable() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    let role_provider = state.provider.get_role_provider();

    let info = role_provider
        .create_static_role(
            &state,
            StaticRoleCreateBuilder::default()
                .name("s1")
                .cloud("c1")
                .username("svc")
                .build()?,
        )
        .await?;
    assert_eq!("svc", info.username);

    let created = role_provider.get_static_role(&state, "s1").await?.unwrap();
    assert_eq!("svc-id", created.user_id);
    assert_ne!(Some("initial".to_string()), keystone.password_of("svc-id"));
    assert_eq!(
        Some(created.secret.expose_secret().to_string()),
        keystone.password_of("svc-id")
    );

    for _ in 0..2 {
        state
            .provider
            .get_rotation_provider()
            .rotate_static_role(&state, "s1")
            .await?;
        let rotated = role_provider.get_static_role(&state, "s1").await?.unwrap();
        assert_eq!("svc-id", rotated.user_id);
        assert_eq!(
            Some(rotated.secret.expose_secret().to_string()),
            keystone.password_of("svc-id")
        );
    }

    // the root password is untouched
    assert_eq!(Some("p0".to_string()), keystone.password_of("admin-id"));
    assert_eq!(
        role_provider.read_static_role(&state, "s1").await?,
        role_provider.read_static_role(&state, "s1").await?
    );
    Ok(())
}

#[tokio::test]
async fn test_auto_rotate_expired_root() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    let cloud_provider = state.provider.get_cloud_provider();
    let mut account = cloud_provider.get_cloud(&state, "c1").await?.unwrap();
    account.root_password_expires_at = Some(Utc::now() - TimeDelta::seconds(1));
    cloud_provider.store_cloud(&state, &account).await?;

    let rotated = state
        .provider
        .get_rotation_provider()
        .auto_rotate(&state)
        .await?;
    assert_eq!(vec!["cloud `c1`".to_string()], rotated);
    assert_ne!(Some("p0".to_string()), keystone.password_of("admin-id"));

    // nothing is due any more
    assert!(
        state
            .provider
            .get_rotation_provider()
            .auto_rotate(&state)
            .await?
            .is_empty()
    );
    Ok(())
}
