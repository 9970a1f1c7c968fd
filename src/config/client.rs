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
//! # Engine configuration
//!
//! Keystone HTTP client options.
use serde::Deserialize;

/// Keystone client options.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSection {
    /// Timeout (in seconds) of a single request to the identity service. The
    /// transport default is used when unset.
    pub timeout: Option<u64>,

    /// Timeout (in seconds) of establishing a connection to the identity
    /// service.
    pub connect_timeout: Option<u64>,

    /// Idle connections are closed after this amount of seconds.
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: u64,

    /// A cached client whose session token expires within this amount of
    /// seconds is discarded and the cloud is authenticated again.
    #[serde(default = "default_token_refresh_margin")]
    pub token_refresh_margin: i64,
}

fn default_pool_idle_timeout() -> u64 {
    90
}

fn default_token_refresh_margin() -> i64 {
    120
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            pool_idle_timeout: default_pool_idle_timeout(),
            token_refresh_margin: default_token_refresh_margin(),
        }
    }
}
