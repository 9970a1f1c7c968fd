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
//! # Cloud account provider API
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::OwnedMutexGuard;

use crate::client::IdentityClient;
use crate::cloud::{CloudProviderError, types::*};
use crate::engine::EngineState;

/// Cloud account provider interface.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Register new cloud account.
    async fn create_cloud(
        &self,
        state: &EngineState,
        cloud: CloudAccountCreate,
    ) -> Result<CloudAccountInfo, CloudProviderError>;

    /// Delete the cloud account and drop its cached client.
    async fn delete_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<(), CloudProviderError>;

    /// Generate a new password according to the policy of the cloud account.
    async fn generate_password<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<SecretString, CloudProviderError>;

    /// Fetch the cloud account.
    async fn get_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Option<CloudAccount>, CloudProviderError>;

    /// Get the authenticated client of the cloud account.
    ///
    /// The client is authenticated with the root credentials on first use and
    /// cached afterwards.
    async fn get_client<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
    ) -> Result<Arc<dyn IdentityClient>, CloudProviderError>;

    /// Drop the cached client of the cloud account.
    async fn invalidate<'a>(&self, name: &'a str);

    /// List names of the cloud accounts.
    async fn list_clouds(&self, state: &EngineState) -> Result<Vec<String>, CloudProviderError>;

    /// Acquire the rotation lock of the cloud account.
    async fn lock_cloud<'a>(&self, name: &'a str) -> OwnedMutexGuard<()>;

    /// Persist the cloud account record as is.
    ///
    /// Used by the root rotation, which holds the rotation lock.
    async fn store_cloud(
        &self,
        state: &EngineState,
        account: &CloudAccount,
    ) -> Result<(), CloudProviderError>;

    /// Update the cloud account.
    async fn update_cloud<'a>(
        &self,
        state: &EngineState,
        name: &'a str,
        data: CloudAccountUpdate,
    ) -> Result<CloudAccountInfo, CloudProviderError>;
}
