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
//! # Rotation provider error
use thiserror::Error;

use crate::client::ClientError;
use crate::cloud::CloudProviderError;
use crate::error::ErrorKind;
use crate::role::RoleProviderError;

/// Rotation provider error.
#[derive(Error, Debug)]
pub enum RotationProviderError {
    /// Static role does not exist.
    #[error("static role `{0}` not found")]
    StaticRoleNotFound(String),

    /// Cloud account provider error.
    #[error(transparent)]
    Cloud {
        /// The source of the error.
        #[from]
        source: CloudProviderError,
    },

    /// Identity service error.
    #[error(transparent)]
    Client {
        /// The source of the error.
        #[from]
        source: ClientError,
    },

    /// Role provider error.
    #[error(transparent)]
    Role {
        /// The source of the error.
        #[from]
        source: RoleProviderError,
    },

    /// The rotation task did not complete.
    #[error("rotation task failed: {source}")]
    Join {
        /// The source of the error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// Some of the periodic rotations failed.
    #[error("automatic rotation failed for {}", .0.join("; "))]
    AutoRotation(Vec<String>),
}

impl RotationProviderError {
    /// Error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StaticRoleNotFound(_) => ErrorKind::NotFound,
            Self::Cloud { source } => source.kind(),
            Self::Client { source } => ErrorKind::from(source),
            Self::Role { source } => source.kind(),
            Self::Join { .. } => ErrorKind::Internal,
            Self::AutoRotation(_) => ErrorKind::Provider,
        }
    }
}
