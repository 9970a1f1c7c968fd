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
//! # Engine state
//!
//! The [Engine] bundles the configuration, the providers and the storage of
//! the host. It is created once during the engine start and passed to every
//! provider call as [EngineState].
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::EngineError;
use crate::plugin_manager::PluginManager;
use crate::provider::Provider;
use crate::rotation::RotationApi;
use crate::storage::Storage;

pub struct Engine {
    /// Engine configuration.
    pub config: Config,
    /// Provider manager.
    pub provider: Provider,
    /// Storage of the host.
    pub storage: Arc<dyn Storage>,
}

pub type EngineState = Arc<Engine>;

impl Engine {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        plugin_manager: &PluginManager,
    ) -> Result<Self, EngineError> {
        let provider = Provider::new(&config, plugin_manager)?;
        Ok(Self::with_provider(config, storage, provider))
    }

    /// Assemble the engine from the prepared provider manager.
    pub fn with_provider(config: Config, storage: Arc<dyn Storage>, provider: Provider) -> Self {
        Self {
            config,
            provider,
            storage,
        }
    }

    /// Run the engine operation until it completes or the caller cancels it.
    ///
    /// Cancellation drops the operation future. Password changes already
    /// accepted by the identity service are still persisted.
    pub async fn cancellable<F, T, E>(token: &CancellationToken, fut: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<EngineError>,
    {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(EngineError::Cancelled),
            res = fut => res.map_err(Into::into),
        }
    }

    /// Rotate the due passwords every `[rotation] check_interval` seconds
    /// until cancelled.
    pub async fn run_periodic(state: EngineState, cancel: CancellationToken) {
        let period = Duration::from_secs(state.config.rotation.check_interval.max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("starting the periodic rotation every {:?}", period);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    match state.provider.get_rotation_provider().auto_rotate(&state).await {
                        Ok(rotated) if rotated.is_empty() => debug!("nothing to rotate"),
                        Ok(rotated) => info!("rotated passwords of {}", rotated.join(", ")),
                        Err(err) => error!("periodic rotation failed: {}", err),
                    }
                }
            }
        }
        info!("periodic rotation stopped");
    }
}
