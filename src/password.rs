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
//! # Password generation
//!
//! Passwords for the cloud accounts, ephemeral users and static roles are
//! produced by [`Passwords`]. When the cloud account names a password policy
//! the generation is delegated to the [`PasswordPolicyGenerator`] provided by
//! the host. Otherwise a random string over [`PASSWORD_CHARSET`] is
//! generated.
//!
//! The result of the policy is returned unvalidated. Enforcing the complexity
//! rules is the job of the policy.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use secrecy::SecretString;
use thiserror::Error;

/// Characters of the generated passwords.
pub const PASSWORD_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz~!@#$%^&*()_+-={}[]:\"'<>,./|\\'?";

/// Characters of the generated user names.
pub const NAME_CHARSET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Password generation error.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Policy is configured, but there is nothing able to apply it.
    #[error("password policy `{0}` is set, but no password policy generator is available")]
    GeneratorMissing(String),

    /// Policy generator failed.
    #[error("password policy `{policy}` failed to generate a password: {message}")]
    Policy {
        /// Policy name.
        policy: String,
        /// Reason reported by the generator.
        message: String,
    },
}

/// Password policy generator.
///
/// Capability of the host to generate passwords according to the named
/// policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordPolicyGenerator: Send + Sync {
    /// Generate password satisfying the policy.
    async fn generate_password<'a>(&self, policy: &'a str) -> Result<SecretString, PasswordError>;
}

/// Password generator bound to the policy of a cloud account.
#[derive(Clone)]
pub struct Passwords {
    /// Name of the password policy.
    policy_name: Option<String>,
    /// Length of the random passwords.
    length: usize,
    /// Policy generator.
    generator: Option<Arc<dyn PasswordPolicyGenerator>>,
}

impl fmt::Debug for Passwords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passwords")
            .field("policy_name", &self.policy_name)
            .field("length", &self.length)
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

impl Passwords {
    pub fn new(
        policy_name: Option<String>,
        length: usize,
        generator: Option<Arc<dyn PasswordPolicyGenerator>>,
    ) -> Self {
        Self {
            policy_name: policy_name.filter(|name| !name.is_empty()),
            length,
            generator,
        }
    }

    /// Name of the policy the generator is bound to.
    pub fn policy_name(&self) -> Option<&str> {
        self.policy_name.as_deref()
    }

    /// Generate a new password.
    pub async fn generate(&self) -> Result<SecretString, PasswordError> {
        match (&self.policy_name, &self.generator) {
            (None, _) => Ok(SecretString::from(random_string(
                PASSWORD_CHARSET,
                self.length,
            ))),
            (Some(policy), None) => Err(PasswordError::GeneratorMissing(policy.clone())),
            (Some(policy), Some(generator)) => generator.generate_password(policy).await,
        }
    }
}

/// Random string of the given length over the charset.
pub fn random_string(charset: &str, length: usize) -> String {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let mut rng = rand::rng();
    (0..length)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect()
}
