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
//! # Shared cloud client
//!
//! Every cloud account known to the engine owns exactly one [`SharedCloud`]
//! in the registry of the cloud provider. It carries the lazily
//! authenticated client of the account and the lock serializing the
//! password rotations.
//!
//! The client slot is guarded by its own mutex held for the whole
//! authentication, so at most one authentication per account is in flight.
//! Issuance only ever touches the client slot. Rotations and administrative
//! writes additionally take the rotation lock.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::client::IdentityClient;
use crate::password::Passwords;

/// Authenticated client state of a single cloud account.
pub struct SharedCloud {
    /// Cloud account name.
    name: String,
    /// Cached client.
    client: Mutex<Option<Arc<dyn IdentityClient>>>,
    /// Rotation lock.
    rotation: Arc<Mutex<()>>,
    /// Password generator bound to the policy of the account.
    passwords: RwLock<Option<Passwords>>,
}

impl fmt::Debug for SharedCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCloud")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SharedCloud {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            client: Mutex::new(None),
            rotation: Arc::new(Mutex::new(())),
            passwords: RwLock::new(None),
        }
    }

    /// Cloud account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the cached client or authenticate a new one.
    ///
    /// The cached client is only reused when its session is valid past
    /// `valid_until`. When `connect` fails the slot stays empty.
    pub async fn get_or_connect<F, Fut, E>(
        &self,
        valid_until: DateTime<Utc>,
        connect: F,
    ) -> Result<Arc<dyn IdentityClient>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn IdentityClient>, E>>,
    {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref()
            && client.expires_at() > valid_until
        {
            return Ok(client.clone());
        }
        *slot = None;
        let client = connect().await?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Whether an authenticated client is cached.
    pub async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Drop the cached client forcing the next use to authenticate again.
    pub async fn invalidate(&self) {
        *self.client.lock().await = None;
    }

    /// Acquire the rotation lock of the account.
    pub async fn lock_rotation(&self) -> OwnedMutexGuard<()> {
        self.rotation.clone().lock_owned().await
    }

    /// Password generator of the account if already bound.
    pub async fn passwords(&self) -> Option<Passwords> {
        self.passwords.read().await.clone()
    }

    /// Bind the password generator to the (possibly changed) policy.
    pub async fn bind_passwords(&self, passwords: Passwords) {
        *self.passwords.write().await = Some(passwords);
    }
}
