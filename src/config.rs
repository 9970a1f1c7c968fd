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
//! Parsing of the engine configuration file. The file uses the INI format
//! with one section per subsystem, every option having a default.
use std::path::PathBuf;

use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use serde::Deserialize;

mod client;
mod cloud;
mod common;
mod default;
mod password;
mod role;
mod rotation;

pub use client::ClientSection;
pub use cloud::CloudSection;
pub use common::default_kv_driver;
pub use default::DefaultSection;
pub use password::PasswordSection;
pub use role::RoleSection;
pub use rotation::RotationSection;

/// Engine configuration.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options.
    #[serde(rename = "DEFAULT", default)]
    pub default: DefaultSection,

    /// Keystone HTTP client options.
    #[serde(default)]
    pub client: ClientSection,

    /// Cloud account provider.
    #[serde(default)]
    pub cloud: CloudSection,

    /// Password generation.
    #[serde(default)]
    pub password: PasswordSection,

    /// Role provider.
    #[serde(default)]
    pub role: RoleSection,

    /// Password rotation.
    #[serde(default)]
    pub rotation: RotationSection,
}

impl Config {
    /// Read the configuration from the file. A missing file results in the
    /// default configuration.
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        builder.try_into()
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;
    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        let mut builder = builder;
        builder = builder
            .set_default("client.token_refresh_margin", "120")?
            .set_default("password.length", "16")?
            .set_default("role.default_ttl", "3600")?
            .set_default("rotation.check_interval", "3600")?;

        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
