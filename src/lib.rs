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
//! # OpenStack secrets engine
//!
//! Credential lifecycle engine for a secrets broker operating against an
//! OpenStack Keystone (v3) identity service. Callers never see the
//! administrative credentials of a cloud. Instead they request a named role
//! and the engine decides, based on the role configuration, whether to hand
//! back:
//!
//! - the root credentials of the cloud account as they are,
//! - a scoped token of the root identity,
//! - a freshly created ephemeral user (with its password), or
//! - a scoped token of such ephemeral user.
//!
//! Every issued credential carries lease information and a revocation
//! descriptor that the host hands back to [`credential::CredentialApi::revoke`]
//! once the lease ends.
//!
//! Next to the dynamic roles the engine manages static roles bound to
//! pre-existing Keystone users whose passwords are rotated periodically, and
//! rotates the root password of every cloud account.
//!
//! The main building blocks are:
//!
//! - [`cloud`]: cloud account records and the shared, lazily authenticated
//!   client cache.
//! - [`role`]: dynamic and static role records and their validation.
//! - [`credential`]: credential issuance and revocation.
//! - [`rotation`]: root and static role password rotation.
//! - [`client`]: the Keystone HTTP client.
//! - [`storage`]: the key-value storage interface provided by the host.
//!
//! All of them are reachable through the [`engine::Engine`] state object.

pub mod client;
pub mod cloud;
pub mod common;
pub mod config;
pub mod credential;
pub mod engine;
pub mod error;
pub mod password;
pub mod plugin_manager;
pub mod provider;
pub mod role;
pub mod rotation;
pub mod storage;
