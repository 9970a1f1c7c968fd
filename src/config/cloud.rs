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
//! Cloud account provider options.
use serde::Deserialize;

use crate::config::common::default_kv_driver;

/// Cloud account provider.
#[derive(Debug, Deserialize, Clone)]
pub struct CloudSection {
    /// Cloud account backend driver.
    #[serde(default = "default_kv_driver")]
    pub driver: String,

    /// Template for the names of the ephemeral users applied to cloud
    /// accounts not specifying their own template.
    #[serde(default = "default_username_template")]
    pub username_template: String,
}

fn default_username_template() -> String {
    "osuser{{random 8 | lowercase}}".into()
}

impl Default for CloudSection {
    fn default() -> Self {
        Self {
            driver: default_kv_driver(),
            username_template: default_username_template(),
        }
    }
}
