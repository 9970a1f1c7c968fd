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
//! # Keystone client error
use reqwest::StatusCode;
use thiserror::Error;

use crate::error::BuilderError;

/// Keystone client error.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The identity service refused the credentials.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The identity service refused the operation.
    #[error("operation is forbidden: {0}")]
    Forbidden(String),

    /// Resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other unexpected response.
    #[error("identity service responded with {status}: {message}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Response body.
        message: String,
    },

    /// Authentication response carries no token.
    #[error("authentication response does not contain the X-Subject-Token header")]
    MissingSubjectToken,

    /// Invalid identity endpoint.
    #[error("invalid identity endpoint {url}: {source}")]
    InvalidUrl {
        /// Configured endpoint.
        url: String,
        /// The source of the error.
        #[source]
        source: url::ParseError,
    },

    /// Transport error.
    #[error(transparent)]
    Reqwest {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// Structure builder error.
    #[error(transparent)]
    Builder {
        /// The source of the error.
        #[from]
        source: BuilderError,
    },
}

impl ClientError {
    /// Map the unsuccessful response status to the error.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            _ => Self::Http { status, message },
        }
    }

    /// Whether the resource is absent at the identity service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the resource already exists at the identity service.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
