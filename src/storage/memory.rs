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
//! # In-memory storage driver
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Storage, StorageEntry, StorageError};

/// Storage keeping the documents in the process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get<'a>(&self, key: &'a str) -> Result<Option<StorageEntry>, StorageError> {
        Ok(self.entries.read().await.get(key).map(|value| StorageEntry {
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        self.entries.write().await.insert(entry.key, entry.value);
        Ok(())
    }

    async fn delete<'a>(&self, key: &'a str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list<'a>(&self, prefix: &'a str) -> Result<Vec<String>, StorageError> {
        let guard = self.entries.read().await;
        let mut keys: Vec<String> = Vec::new();
        for key in guard.keys() {
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };
            let child = match rest.find('/') {
                Some(pos) => &rest[..=pos],
                None => rest,
            };
            if !child.is_empty() && keys.last().map(String::as_str) != Some(child) {
                keys.push(child.to_string());
            }
        }
        Ok(keys)
    }
}
