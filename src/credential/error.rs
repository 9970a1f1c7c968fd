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
//! # Credential provider error
use thiserror::Error;

use crate::client::ClientError;
use crate::cloud::CloudProviderError;
use crate::error::{BuilderError, ErrorKind};
use crate::role::RoleProviderError;

/// Credential provider error.
#[derive(Error, Debug)]
pub enum CredentialProviderError {
    /// Dynamic role does not exist.
    #[error("role `{0}` not found")]
    RoleNotFound(String),

    /// Static role does not exist.
    #[error("static role `{0}` not found")]
    StaticRoleNotFound(String),

    /// Project of the role does not exist.
    #[error("project `{name}` not found in the cloud `{cloud}`")]
    ProjectNotFound {
        /// Project name.
        name: String,
        /// Cloud account name.
        cloud: String,
    },

    /// Every generated user name is already taken.
    #[error("failed to create a unique user for the role `{role}` after {attempts} attempts")]
    UsernameExhausted {
        /// Role name.
        role: String,
        /// Number of the attempts made.
        attempts: usize,
    },

    /// Roles can not be granted since the user has no domain.
    #[error("no project or domain to grant the roles of the role `{0}` on")]
    NoGrantTarget(String),

    /// Both revocation steps failed.
    #[error("failed to revoke the token ({token}) and to delete the user ({user})")]
    Revocation {
        /// Token revocation error.
        token: ClientError,
        /// User deletion error.
        user: ClientError,
    },

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

    /// Structure builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },
}

impl CredentialProviderError {
    /// Error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoleNotFound(_) | Self::StaticRoleNotFound(_) => ErrorKind::NotFound,
            Self::ProjectNotFound { .. } => ErrorKind::Conflict,
            Self::UsernameExhausted { .. } | Self::Revocation { .. } => ErrorKind::Provider,
            Self::NoGrantTarget(_) => ErrorKind::Validation,
            Self::Cloud { source } => source.kind(),
            Self::Client { source } => ErrorKind::from(source),
            Self::Role { source } => source.kind(),
            Self::Builder { .. } => ErrorKind::Internal,
        }
    }
}
