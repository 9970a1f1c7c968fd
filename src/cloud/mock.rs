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
//! # Cloud account provider - internal mocking tools.
use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use secrecy::SecretString;
use tokio::sync::OwnedMutexGuard;

use crate::client::IdentityClient;
use crate::cloud::{CloudApi, CloudProviderError, types::*};
use crate::config::Config;
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;

#[cfg(test)]
mock! {
    pub CloudProvider {
        pub fn new(cfg: &Config, plugin_manager: &PluginManager) -> Result<Self, CloudProviderError>;
    }

    #[async_trait]
    impl CloudApi for CloudProvider {
        async fn create_cloud(
            &self,
            state: &EngineState,
            cloud: CloudAccountCreate,
        ) -> Result<CloudAccountInfo, CloudProviderError>;

        async fn delete_cloud<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<(), CloudProviderError>;

        async fn generate_password<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<SecretString, CloudProviderError>;

        async fn get_cloud<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<Option<CloudAccount>, CloudProviderError>;

        async fn get_client<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
        ) -> Result<Arc<dyn IdentityClient>, CloudProviderError>;

        async fn invalidate<'a>(&self, name: &'a str);

        async fn list_clouds(&self, state: &EngineState) -> Result<Vec<String>, CloudProviderError>;

        async fn lock_cloud<'a>(&self, name: &'a str) -> OwnedMutexGuard<()>;

        async fn store_cloud(
            &self,
            state: &EngineState,
            account: &CloudAccount,
        ) -> Result<(), CloudProviderError>;

        async fn update_cloud<'a>(
            &self,
            state: &EngineState,
            name: &'a str,
            data: CloudAccountUpdate,
        ) -> Result<CloudAccountInfo, CloudProviderError>;
    }
}
