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
//! # Key-value storage backend of the roles
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use super::RoleBackend;
use crate::engine::EngineState;
use crate::role::{RoleProviderError, types::*};
use crate::storage::StorageEntry;

/// Key prefix of the dynamic role records.
pub const ROLE_PREFIX: &str = "roles/";
/// Key prefix of the static role records.
pub const STATIC_ROLE_PREFIX: &str = "static-roles/";

/// Backend storing the roles in the storage of the host.
#[derive(Clone, Debug, Default)]
pub struct KvBackend {}

async fn get<T: DeserializeOwned>(
    state: &EngineState,
    prefix: &str,
    name: &str,
) -> Result<Option<T>, RoleProviderError> {
    match state.storage.get(&format!("{prefix}{name}")).await? {
        Some(entry) => Ok(Some(entry.decode()?)),
        None => Ok(None),
    }
}

async fn put<T: Serialize>(
    state: &EngineState,
    prefix: &str,
    name: &str,
    val: &T,
) -> Result<(), RoleProviderError> {
    let entry = StorageEntry::from_json(format!("{prefix}{name}"), val)?;
    Ok(state.storage.put(entry).await?)
}

async fn list(state: &EngineState, prefix: &str) -> Result<Vec<String>, RoleProviderError> {
    Ok(state
        .storage
        .list(prefix)
        .await?
        .into_iter()
        .filter(|name| !name.ends_with('/'))
        .collect())
}

#[async_trait]
impl RoleBackend for KvBackend {
    async fn get_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<DynamicRole>, RoleProviderError> {
        get(state, ROLE_PREFIX, name).await
    }

    async fn put_dynamic_role(
        &self,
        state: &EngineState,
        role: &DynamicRole,
    ) -> Result<(), RoleProviderError> {
        put(state, ROLE_PREFIX, &role.name, role).await
    }

    async fn delete_dynamic_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError> {
        Ok(state.storage.delete(&format!("{ROLE_PREFIX}{name}")).await?)
    }

    async fn list_dynamic_roles(
        &self,
        state: &EngineState,
    ) -> Result<Vec<String>, RoleProviderError> {
        list(state, ROLE_PREFIX).await
    }

    async fn get_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<StaticRole>, RoleProviderError> {
        get(state, STATIC_ROLE_PREFIX, name).await
    }

    async fn put_static_role(
        &self,
        state: &EngineState,
        role: &StaticRole,
    ) -> Result<(), RoleProviderError> {
        put(state, STATIC_ROLE_PREFIX, &role.name, role).await
    }

    async fn delete_static_role<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), RoleProviderError> {
        Ok(state
            .storage
            .delete(&format!("{STATIC_ROLE_PREFIX}{name}"))
            .await?)
    }

    async fn list_static_roles(
        &self,
        state: &EngineState,
    ) -> Result<Vec<String>, RoleProviderError> {
        list(state, STATIC_ROLE_PREFIX).await
    }
}
