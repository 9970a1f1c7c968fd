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
//! # Storage error
use thiserror::Error;

/// Storage error.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error reported by the storage driver of the host.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Stored document can not be parsed.
    #[error("failed to decode the storage entry {key}: {source}")]
    Decode {
        /// Entry key.
        key: String,
        /// The source of the error.
        #[source]
        source: serde_json::Error,
    },

    /// Document can not be serialized.
    #[error("failed to encode the storage entry {key}: {source}")]
    Encode {
        /// Entry key.
        key: String,
        /// The source of the error.
        #[source]
        source: serde_json::Error,
    },
}
