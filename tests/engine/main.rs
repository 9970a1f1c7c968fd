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
//! Engine tests against the in-memory identity service.
use std::sync::Arc;

use eyre::Report;
use secrecy::SecretString;

use openstack_secrets::cloud::CloudApi;
use openstack_secrets::cloud::types::CloudAccountCreateBuilder;
use openstack_secrets::config::Config;
use openstack_secrets::engine::{Engine, EngineState};
use openstack_secrets::plugin_manager::PluginManager;
use openstack_secrets::storage::MemoryStorage;

mod credential;
mod fake;
mod role;
mod rotation;

use fake::{AUTH_URL, FakeConnector, FakeKeystone};

fn get_state(keystone: &Arc<FakeKeystone>) -> Result<EngineState, Report> {
    let mut plugin_manager = PluginManager::default();
    plugin_manager.register_identity_connector(Arc::new(FakeConnector(keystone.clone())));
    Ok(Arc::new(Engine::new(
        Config::default(),
        Arc::new(MemoryStorage::default()),
        &plugin_manager,
    )?))
}

/// Engine with the `c1` cloud of the `admin` user.
async fn setup() -> Result<(Arc<FakeKeystone>, EngineState), Report> {
    let keystone = FakeKeystone::new();
    let state = get_state(&keystone)?;
    state
        .provider
        .get_cloud_provider()
        .create_cloud(
            &state,
            CloudAccountCreateBuilder::default()
                .name("c1")
                .auth_url(AUTH_URL)
                .username("admin")
                .password(SecretString::from("p0"))
                .user_domain_name("Default")
                .validate(true)
                .build()?,
        )
        .await?;
    Ok((keystone, state))
}
