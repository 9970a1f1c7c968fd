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
//! Role provider options.
use serde::Deserialize;

use crate::config::common::default_kv_driver;

/// Role provider.
#[derive(Debug, Deserialize, Clone)]
pub struct RoleSection {
    /// Role backend driver.
    #[serde(default = "default_kv_driver")]
    pub driver: String,

    /// Lease duration (in seconds) of the credentials issued for non-root
    /// dynamic roles not specifying the `ttl`.
    #[serde(default = "default_ttl")]
    pub default_ttl: u64,

    /// Rotation interval (in seconds) of static roles not specifying the
    /// `ttl`.
    #[serde(default = "default_ttl")]
    pub static_rotation_ttl: u64,
}

fn default_ttl() -> u64 {
    3600
}

impl Default for RoleSection {
    fn default() -> Self {
        Self {
            driver: default_kv_driver(),
            default_ttl: default_ttl(),
            static_rotation_ttl: default_ttl(),
        }
    }
}
