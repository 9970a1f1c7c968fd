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
//! # Cloud account provider backends
use async_trait::async_trait;

use crate::cloud::{CloudProviderError, types::*};
use crate::engine::EngineState;

pub mod kv;

/// CloudBackend trait.
///
/// Backend driver interface expected by the cloud account provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudBackend: Send + Sync {
    /// Fetch the cloud account.
    async fn get_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<CloudAccount>, CloudProviderError>;

    /// Create or replace the cloud account.
    async fn put_cloud(
        &self,
        state: &EngineState,
        account: &CloudAccount,
    ) -> Result<(), CloudProviderError>;

    /// Delete the cloud account.
    async fn delete_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), CloudProviderError>;

    /// List names of the cloud accounts.
    async fn list_clouds(&self, state: &EngineState) -> Result<Vec<String>, CloudProviderError>;
}
