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
//! # Error
//!
//! Errors returned to the host. Every error is classified with the
//! [`ErrorKind`] so that the host can tell an input the caller can correct
//! (validation, conflict, missing entity) from a hard failure.
use reqwest::StatusCode;
use thiserror::Error;

use crate::client::ClientError;
use crate::cloud::CloudProviderError;
use crate::credential::CredentialProviderError;
use crate::password::PasswordError;
use crate::role::RoleProviderError;
use crate::rotation::RotationProviderError;
use crate::storage::StorageError;

/// Builder error.
///
/// Error of the `build` methods generated for the builder structures.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Mandatory field is not set.
    #[error("{0}")]
    UninitializedField(String),

    /// Custom validation error.
    #[error("{0}")]
    Validation(String),
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    fn from(source: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(source.to_string())
    }
}

impl From<String> for BuilderError {
    fn from(source: String) -> Self {
        Self::Validation(source)
    }
}

/// Error classification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The engine is misconfigured (i.e. password policy without a
    /// generator).
    Configuration,
    /// The proposed write is rejected.
    Validation,
    /// The entity already exists or references entities that do not exist
    /// at the identity service.
    Conflict,
    /// The entity does not exist.
    NotFound,
    /// The identity service failed or refused the operation.
    Provider,
    /// The storage of the host failed.
    Storage,
    /// The caller cancelled the operation.
    Cancelled,
    /// Unexpected internal error.
    Internal,
}

impl ErrorKind {
    /// Whether the caller can correct the input and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation | Self::Conflict | Self::NotFound)
    }

    /// HTTP status representing the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Provider => StatusCode::BAD_GATEWAY,
            Self::Cancelled => StatusCode::REQUEST_TIMEOUT,
            Self::Configuration | Self::Storage | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<&ClientError> for ErrorKind {
    fn from(value: &ClientError) -> Self {
        match value {
            ClientError::Builder { .. } => Self::Internal,
            _ => Self::Provider,
        }
    }
}

impl From<&PasswordError> for ErrorKind {
    fn from(value: &PasswordError) -> Self {
        match value {
            PasswordError::GeneratorMissing(_) => Self::Configuration,
            PasswordError::Policy { .. } => Self::Provider,
        }
    }
}

/// Engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Keystone client error.
    #[error(transparent)]
    Client {
        /// The source of the error.
        #[from]
        source: ClientError,
    },

    /// Cloud account provider error.
    #[error(transparent)]
    Cloud {
        /// The source of the error.
        #[from]
        source: CloudProviderError,
    },

    /// Credential provider error.
    #[error(transparent)]
    Credential {
        /// The source of the error.
        #[from]
        source: CredentialProviderError,
    },

    /// Role provider error.
    #[error(transparent)]
    Role {
        /// The source of the error.
        #[from]
        source: RoleProviderError,
    },

    /// Rotation provider error.
    #[error(transparent)]
    Rotation {
        /// The source of the error.
        #[from]
        source: RotationProviderError,
    },

    /// Storage error.
    #[error(transparent)]
    Storage {
        /// The source of the error.
        #[from]
        source: StorageError,
    },

    /// The operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,
}

impl EngineError {
    /// Error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { source } => ErrorKind::from(source),
            Self::Cloud { source } => source.kind(),
            Self::Credential { source } => source.kind(),
            Self::Role { source } => source.kind(),
            Self::Rotation { source } => source.kind(),
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the caller can correct the input and retry.
    pub fn is_client_error(&self) -> bool {
        self.kind().is_client_error()
    }

    /// HTTP status representing the error.
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}
