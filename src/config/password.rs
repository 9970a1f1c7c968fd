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
//! Password generation options.
use serde::Deserialize;

/// Password generation.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordSection {
    /// Length of the passwords generated for cloud accounts without a
    /// password policy.
    #[serde(default = "default_password_length")]
    pub length: usize,
}

fn default_password_length() -> usize {
    16
}

impl Default for PasswordSection {
    fn default() -> Self {
        Self {
            length: default_password_length(),
        }
    }
}
