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
//! # Role provider error
use thiserror::Error;

use crate::client::ClientError;
use crate::cloud::CloudProviderError;
use crate::error::{BuilderError, ErrorKind};
use crate::rotation::RotationProviderError;
use crate::storage::StorageError;

/// Role provider error.
#[derive(Error, Debug)]
pub enum RoleProviderError {
    /// Role does not exist.
    #[error("role `{0}` not found")]
    RoleNotFound(String),

    /// Role to update does not exist.
    #[error("role `{0}` not found during update operation")]
    RoleNotFoundForUpdate(String),

    /// Role already exists.
    #[error("role `{0}` already exists")]
    Conflict(String),

    /// Required field is not set.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Field not allowed for the root roles.
    #[error("impossible to set {0} for the root user")]
    RootIncompatible(&'static str),

    /// Field can not be changed after the role is created.
    #[error("{0} can not be changed once the role is created")]
    ImmutableField(&'static str),

    /// Referenced groups or roles are not known to the identity service.
    #[error("{kind} not found in the cloud `{cloud}`: {names}")]
    UnknownEntities {
        /// Entity kind.
        kind: &'static str,
        /// Cloud account name.
        cloud: String,
        /// Comma separated missing names.
        names: String,
    },

    /// Static role user does not exist at the identity service.
    #[error("user `{username}` not found in the cloud `{cloud}`")]
    UserNotFound {
        /// User name.
        username: String,
        /// Cloud account name.
        cloud: String,
    },

    /// Field validation error.
    #[error(transparent)]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
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

    /// Password rotation of the static role failed.
    #[error(transparent)]
    Rotation {
        /// The source of the error.
        source: Box<RotationProviderError>,
    },

    /// Storage error.
    #[error(transparent)]
    Storage {
        /// The source of the error.
        #[from]
        source: StorageError,
    },

    /// Structure builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },

    /// Unsupported driver.
    #[error("unsupported driver {0}")]
    UnsupportedDriver(String),
}

impl From<RotationProviderError> for RoleProviderError {
    fn from(source: RotationProviderError) -> Self {
        Self::Rotation {
            source: Box::new(source),
        }
    }
}

impl RoleProviderError {
    /// Error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoleNotFound(_) | Self::RoleNotFoundForUpdate(_) => ErrorKind::NotFound,
            Self::Conflict(_) | Self::UnknownEntities { .. } | Self::UserNotFound { .. } => {
                ErrorKind::Conflict
            }
            Self::MissingField(_)
            | Self::RootIncompatible(_)
            | Self::ImmutableField(_)
            | Self::Validation { .. } => ErrorKind::Validation,
            Self::Cloud { source } => source.kind(),
            Self::Client { source } => ErrorKind::from(source),
            Self::Rotation { source } => source.kind(),
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Builder { .. } => ErrorKind::Internal,
            Self::UnsupportedDriver(_) => ErrorKind::Configuration,
        }
    }
}
