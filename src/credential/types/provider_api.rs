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
//! # Credential provider API
use async_trait::async_trait;

use crate::credential::{CredentialProviderError, types::*};
use crate::engine::EngineState;

/// Credential provider interface.
#[async_trait]
pub trait CredentialApi: Send + Sync {
    /// Issue the credentials of the dynamic role.
    async fn issue<'a>(
        &self,
        state: &EngineState,
        role: &'a str,
    ) -> Result<IssuedCredential, CredentialProviderError>;

    /// Read the credentials of the static role.
    async fn read_static_credentials<'a>(
        &self,
        state: &EngineState,
        role: &'a str,
    ) -> Result<IssuedCredential, CredentialProviderError>;

    /// Undo the issuance once the lease ends.
    async fn revoke(
        &self,
        state: &EngineState,
        revocation: &Revocation,
    ) -> Result<(), CredentialProviderError>;
}
