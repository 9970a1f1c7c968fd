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
//! # Common helpers
use secrecy::{ExposeSecret, SecretString};
use serde::Serializer;
use validator::ValidationError;

/// Validate the name of a stored record.
///
/// The name becomes a single segment of the storage key, so the path separator
/// is rejected.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.contains('/') {
        let mut err = ValidationError::new("invalid_name");
        err.message = Some("the name must not contain `/`".into());
        return Err(err);
    }
    Ok(())
}

/// Serialize the secret value.
///
/// Used only for the records written into the storage of the host and for the
/// requests sent to the identity service.
pub fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

/// Serialize the optional secret value.
pub fn serialize_optional_secret<S>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match secret {
        Some(val) => serializer.serialize_some(val.expose_secret()),
        None => serializer.serialize_none(),
    }
}
