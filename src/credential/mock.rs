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
//! # Credential provider - internal mocking tools.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

use crate::config::Config;
use crate::credential::{CredentialApi, CredentialProviderError, types::*};
use crate::engine::EngineState;
use crate::plugin_manager::PluginManager;

#[cfg(test)]
mock! {
    pub CredentialProvider {
        pub fn new(cfg: &Config, plugin_manager: &PluginManager) -> Result<Self, CredentialProviderError>;
    }

    #[async_trait]
    impl CredentialApi for CredentialProvider {
        async fn issue<'a>(
            &self,
            state: &EngineState,
            role: &'a str,
        ) -> Result<IssuedCredential, CredentialProviderError>;

        async fn read_static_credentials<'a>(
            &self,
            state: &EngineState,
            role: &'a str,
        ) -> Result<IssuedCredential, CredentialProviderError>;

        async fn revoke(
            &self,
            state: &EngineState,
            revocation: &Revocation,
        ) -> Result<(), CredentialProviderError>;
    }
}
