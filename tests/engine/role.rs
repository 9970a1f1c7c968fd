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
use eyre::Report;

use openstack_secrets::error::ErrorKind;
use openstack_secrets::role::RoleApi;
use openstack_secrets::role::types::{DynamicRoleCreateBuilder, StaticRoleCreateBuilder};

use super::setup;

#[tokio::test]
async fn test_root_role_with_ttl_is_rejected() -> Result<(), Report> {
    let (_keystone, state) = setup().await?;
    let role_provider = state.provider.get_role_provider();
    let err = role_provider
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("root")
                .cloud("c1")
                .root(true)
                .ttl(60u64)
                .build()?,
        )
        .await
        .unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
    assert!(role_provider.get_dynamic_role(&state, "root").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_unknown_groups() -> Result<(), Report> {
    let (_keystone, state) = setup().await?;
    let role_provider = state.provider.get_role_provider();
    let err = role_provider
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("r1")
                .cloud("c1")
                .user_groups(vec!["devs".to_string(), "ops".to_string()])
                .build()?,
        )
        .await
        .unwrap_err();
    assert_eq!(ErrorKind::Conflict, err.kind());
    assert_eq!("groups not found in the cloud `c1`: ops", err.to_string());
    assert!(role_provider.get_dynamic_role(&state, "r1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_unknown_cloud() -> Result<(), Report> {
    let (_keystone, state) = setup().await?;
    let err = state
        .provider
        .get_role_provider()
        .create_dynamic_role(
            &state,
            DynamicRoleCreateBuilder::default()
                .name("r1")
                .cloud("nope")
                .build()?,
        )
        .await
        .unwrap_err();
    assert_eq!(ErrorKind::NotFound, err.kind());
    Ok(())
}

#[tokio::test]
async fn test_static_role_unknown_user() -> Result<(), Report> {
    let (keystone, state) = setup().await?;
    let err = state
        .provider
        .get_role_provider()
        .create_static_role(
            &state,
            StaticRoleCreateBuilder::default()
                .name("s1")
                .cloud("c1")
                .username("ghost")
                .build()?,
        )
        .await
        .unwrap_err();
    assert_eq!(
        "user `ghost` not found in the cloud `c1`",
        err.to_string()
    );
    assert_eq!(Some("initial".to_string()), keystone.password_of("svc-id"));
    Ok(())
}

#[tokio::test]
async fn test_list_by_cloud() -> Result<(), Report> {
    let (_keystone, state) = setup().await?;
    let role_provider = state.provider.get_role_provider();
    for name in ["b", "a"] {
        role_provider
            .create_dynamic_role(
                &state,
                DynamicRoleCreateBuilder::default()
                    .name(name)
                    .cloud("c1")
                    .build()?,
            )
            .await?;
    }
    let first = role_provider
        .list_dynamic_roles(&state, &Default::default())
        .await?;
    assert_eq!(
        first,
        role_provider
            .list_dynamic_roles(&state, &Default::default())
            .await?
    );
    assert_eq!(2, first.len());
    Ok(())
}
