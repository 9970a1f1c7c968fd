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
//! # Provider manager
//!
//! Provider manager provides access to the individual providers. This gives
//! an easy way of passing the overall manager down to the individual
//! providers that might need to call other providers while also allowing an
//! easy injection of mocked providers.
use derive_builder::Builder;
use mockall_double::double;

use crate::cloud::CloudApi;
#[double]
use crate::cloud::CloudProvider;
use crate::config::Config;
use crate::credential::CredentialApi;
#[double]
use crate::credential::CredentialProvider;
use crate::error::EngineError;
use crate::plugin_manager::PluginManager;
use crate::role::RoleApi;
#[double]
use crate::role::RoleProvider;
use crate::rotation::RotationApi;
#[double]
use crate::rotation::RotationProvider;

/// Global provider manager.
#[derive(Builder)]
// It is necessary to use the owned pattern since otherwise builder invokes clone which immediately
// confuses mockall used in tests
#[builder(pattern = "owned")]
pub struct Provider {
    /// Cloud account provider.
    cloud: CloudProvider,
    /// Credential provider.
    credential: CredentialProvider,
    /// Role provider.
    role: RoleProvider,
    /// Rotation provider.
    rotation: RotationProvider,
}

impl Provider {
    pub fn new(cfg: &Config, plugin_manager: &PluginManager) -> Result<Self, EngineError> {
        Ok(Self {
            cloud: CloudProvider::new(cfg, plugin_manager)?,
            credential: CredentialProvider::new(cfg, plugin_manager)?,
            role: RoleProvider::new(cfg, plugin_manager)?,
            rotation: RotationProvider::new(cfg, plugin_manager)?,
        })
    }

    /// Get the cloud account provider.
    pub fn get_cloud_provider(&self) -> &impl CloudApi {
        &self.cloud
    }

    /// Get the credential provider.
    pub fn get_credential_provider(&self) -> &impl CredentialApi {
        &self.credential
    }

    /// Get the role provider.
    pub fn get_role_provider(&self) -> &impl RoleApi {
        &self.role
    }

    /// Get the rotation provider.
    pub fn get_rotation_provider(&self) -> &impl RotationApi {
        &self.rotation
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        ProviderBuilder::default()
            .cloud(crate::cloud::MockCloudProvider::default())
            .credential(crate::credential::MockCredentialProvider::default())
            .role(crate::role::MockRoleProvider::default())
            .rotation(crate::rotation::MockRotationProvider::default())
    }
}
