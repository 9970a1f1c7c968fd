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
//! Password rotation options.
use serde::Deserialize;

/// Password rotation.
#[derive(Debug, Deserialize, Clone)]
pub struct RotationSection {
    /// Interval (in seconds) between two runs of the automatic rotation.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    /// Lifetime (in seconds) of the root password of cloud accounts not
    /// specifying their own. The password is rotated automatically once it
    /// expires. `0` disables the automatic root password rotation.
    #[serde(default = "default_root_password_ttl")]
    pub root_password_ttl: u64,
}

fn default_check_interval() -> u64 {
    3600
}

fn default_root_password_ttl() -> u64 {
    // 30 days
    2_592_000
}

impl Default for RotationSection {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            root_password_ttl: default_root_password_ttl(),
        }
    }
}
