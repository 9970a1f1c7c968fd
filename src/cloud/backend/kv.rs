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
//! # Key-value storage backend of the cloud accounts
use async_trait::async_trait;

use super::CloudBackend;
use crate::cloud::{CloudProviderError, types::*};
use crate::engine::EngineState;
use crate::storage::StorageEntry;

/// Key prefix of the cloud account records.
pub const CLOUD_PREFIX: &str = "cloud/";

fn key(name: &str) -> String {
    format!("{CLOUD_PREFIX}{name}")
}

/// Backend storing the cloud accounts in the storage of the host.
#[derive(Clone, Debug, Default)]
pub struct KvBackend {}

#[async_trait]
impl CloudBackend for KvBackend {
    async fn get_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<CloudAccount>, CloudProviderError> {
        match state.storage.get(&key(name)).await? {
            Some(entry) => Ok(Some(entry.decode()?)),
            None => Ok(None),
        }
    }

    async fn put_cloud(
        &self,
        state: &EngineState,
        account: &CloudAccount,
    ) -> Result<(), CloudProviderError> {
        let entry = StorageEntry::from_json(key(&account.name), account)?;
        Ok(state.storage.put(entry).await?)
    }

    async fn delete_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), CloudProviderError> {
        Ok(state.storage.delete(&key(name)).await?)
    }

    async fn list_clouds(&self, state: &EngineState) -> Result<Vec<String>, CloudProviderError> {
        Ok(state
            .storage
            .list(CLOUD_PREFIX)
            .await?
            .into_iter()
            .filter(|name| !name.ends_with('/'))
            .collect())
    }
}
