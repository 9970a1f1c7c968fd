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
//! # Plugin manager
//!
//! A driver, also known as a backend, is an abstraction around the data
//! access needed by a particular provider. The engine ships drivers keeping
//! the records in the storage of the host, but custom drivers can be passed
//! during the engine start.
//!
//! Besides the backend drivers the [PluginManager] carries the capabilities
//! provided by the host: the password policy generator and an alternative
//! identity connector.
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::IdentityConnector;
use crate::cloud::backend::CloudBackend;
use crate::password::PasswordPolicyGenerator;
use crate::role::backend::RoleBackend;

/// Plugin manager allowing to pass custom backend plugins implementing required
/// trait during the engine start.
#[derive(Clone, Default)]
pub struct PluginManager {
    /// Cloud account backend plugins.
    cloud_backends: HashMap<String, Arc<dyn CloudBackend>>,
    /// Role backend plugins.
    role_backends: HashMap<String, Arc<dyn RoleBackend>>,
    /// Identity connector replacing the Keystone HTTP client.
    identity_connector: Option<Arc<dyn IdentityConnector>>,
    /// Password policy generator of the host.
    password_policy_generator: Option<Arc<dyn PasswordPolicyGenerator>>,
}

impl PluginManager {
    /// Register cloud account backend.
    pub fn register_cloud_backend<S: AsRef<str>>(
        &mut self,
        name: S,
        plugin: Arc<dyn CloudBackend>,
    ) {
        self.cloud_backends.insert(name.as_ref().to_string(), plugin);
    }

    /// Register role backend.
    pub fn register_role_backend<S: AsRef<str>>(&mut self, name: S, plugin: Arc<dyn RoleBackend>) {
        self.role_backends.insert(name.as_ref().to_string(), plugin);
    }

    /// Register identity connector.
    pub fn register_identity_connector(&mut self, connector: Arc<dyn IdentityConnector>) {
        self.identity_connector = Some(connector);
    }

    /// Register password policy generator.
    pub fn register_password_policy_generator(
        &mut self,
        generator: Arc<dyn PasswordPolicyGenerator>,
    ) {
        self.password_policy_generator = Some(generator);
    }

    /// Get registered cloud account backend.
    pub fn get_cloud_backend<S: AsRef<str>>(&self, name: S) -> Option<&Arc<dyn CloudBackend>> {
        self.cloud_backends.get(name.as_ref())
    }

    /// Get registered role backend.
    pub fn get_role_backend<S: AsRef<str>>(&self, name: S) -> Option<&Arc<dyn RoleBackend>> {
        self.role_backends.get(name.as_ref())
    }

    /// Get registered identity connector.
    pub fn get_identity_connector(&self) -> Option<&Arc<dyn IdentityConnector>> {
        self.identity_connector.as_ref()
    }

    /// Get registered password policy generator.
    pub fn get_password_policy_generator(&self) -> Option<&Arc<dyn PasswordPolicyGenerator>> {
        self.password_policy_generator.as_ref()
    }
}
