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
//! # Storage
//!
//! Key-value storage interface provided by the host. Cloud accounts and roles
//! are persisted as JSON documents under namespaced keys:
//!
//! - `cloud/<name>`
//! - `roles/<name>`
//! - `static-roles/<name>`
//!
//! The transactional guarantees are those of the host driver. The
//! [`MemoryStorage`] driver keeps the documents in the process memory and is
//! used when embedding the engine without a persistent store.
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryStorage;

/// Single storage document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorageEntry {
    /// Entry key.
    pub key: String,
    /// Raw document.
    pub value: Vec<u8>,
}

impl StorageEntry {
    /// Serialize the value as JSON document under the key.
    pub fn from_json<K: Into<String>, T: Serialize>(
        key: K,
        value: &T,
    ) -> Result<Self, StorageError> {
        let key = key.into();
        let value = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            key: key.clone(),
            source,
        })?;
        Ok(Self { key, value })
    }

    /// Parse the JSON document.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        serde_json::from_slice(&self.value).map_err(|source| StorageError::Decode {
            key: self.key.clone(),
            source,
        })
    }
}

/// Storage trait.
///
/// Interface of the key-value storage of the host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the entry.
    async fn get<'a>(&self, key: &'a str) -> Result<Option<StorageEntry>, StorageError>;

    /// Create or replace the entry.
    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError>;

    /// Delete the entry. Deleting a missing entry is not an error.
    async fn delete<'a>(&self, key: &'a str) -> Result<(), StorageError>;

    /// List the keys directly under the prefix.
    ///
    /// Returned keys are relative to the prefix. Nested levels are returned
    /// once with the trailing `/`.
    async fn list<'a>(&self, prefix: &'a str) -> Result<Vec<String>, StorageError>;
}
