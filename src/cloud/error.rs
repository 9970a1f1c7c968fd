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
//! # Cloud account provider error
use thiserror::Error;

use crate::client::ClientError;
use crate::error::{BuilderError, ErrorKind};
use crate::password::PasswordError;
use crate::storage::StorageError;

/// Cloud account provider error.
#[derive(Error, Debug)]
pub enum CloudProviderError {
    /// Cloud account does not exist.
    #[error("cloud `{0}` is not configured")]
    NotConfigured(String),

    /// Cloud account already exists.
    #[error("cloud `{0}` already exists")]
    Conflict(String),

    /// Required field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Username template can not be used.
    #[error("invalid username template `{template}`: {reason}")]
    UsernameTemplate {
        /// The template.
        template: String,
        /// Why the template is rejected.
        reason: String,
    },

    /// Field validation error.
    #[error(transparent)]
    Validation {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },

    /// Identity service error.
    #[error(transparent)]
    Client {
        /// The source of the error.
        #[from]
        source: ClientError,
    },

    /// Password generation error.
    #[error(transparent)]
    Password {
        /// The source of the error.
        #[from]
        source: PasswordError,
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

impl CloudProviderError {
    /// Error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::MissingField(_) | Self::UsernameTemplate { .. } | Self::Validation { .. } => {
                ErrorKind::Validation
            }
            Self::Client { source } => ErrorKind::from(source),
            Self::Password { source } => ErrorKind::from(source),
            Self::UnsupportedDriver(_) => ErrorKind::Configuration,
            Self::Builder { .. } => ErrorKind::Internal,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }
}
