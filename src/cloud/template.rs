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
//! # Username template
//!
//! Names of the ephemeral users are rendered from the template of the cloud
//! account. Plain text is copied as is while the expressions in double curly
//! braces are evaluated:
//!
//! - `random N`: `N` random characters from [`NAME_CHARSET`],
//! - `unix_time`: current Unix timestamp,
//! - `role_name`: name of the requested role,
//! - `cloud`: name of the cloud account.
//!
//! The value of an expression can be piped through the `lowercase`,
//! `uppercase` and `truncate N` filters, i.e. `{{random 8 | lowercase}}`.
use chrono::Utc;
use regex::Regex;

use crate::cloud::CloudProviderError;
use crate::password::{NAME_CHARSET, random_string};

/// Maximal length of the Keystone user name.
const MAX_USERNAME_LENGTH: usize = 255;

#[derive(Clone, Debug, PartialEq)]
enum Part {
    Literal(String),
    Expression(Function, Vec<Filter>),
}

#[derive(Clone, Debug, PartialEq)]
enum Function {
    Random(usize),
    UnixTime,
    RoleName,
    Cloud,
}

#[derive(Clone, Debug, PartialEq)]
enum Filter {
    Lowercase,
    Uppercase,
    Truncate(usize),
}

/// Values available to the template expressions.
#[derive(Clone, Copy, Debug)]
pub struct TemplateContext<'a> {
    /// Requested role.
    pub role_name: &'a str,
    /// Cloud account.
    pub cloud: &'a str,
}

/// Parsed username template.
#[derive(Clone, Debug, PartialEq)]
pub struct UsernameTemplate {
    parts: Vec<Part>,
}

fn invalid<T: Into<String>>(template: &str, reason: T) -> CloudProviderError {
    CloudProviderError::UsernameTemplate {
        template: template.to_string(),
        reason: reason.into(),
    }
}

fn parse_number(template: &str, val: Option<&str>) -> Result<usize, CloudProviderError> {
    val.and_then(|x| x.parse::<usize>().ok())
        .filter(|x| (1..=MAX_USERNAME_LENGTH).contains(x))
        .ok_or_else(|| {
            invalid(
                template,
                format!("a number between 1 and {MAX_USERNAME_LENGTH} is expected"),
            )
        })
}

fn parse_literal(template: &str, text: &str) -> Result<Part, CloudProviderError> {
    if text.contains("{{") || text.contains("}}") {
        return Err(invalid(template, "unbalanced curly braces"));
    }
    Ok(Part::Literal(text.to_string()))
}

fn parse_expression(template: &str, expression: &str) -> Result<Part, CloudProviderError> {
    let mut pipeline = expression.split('|').map(str::trim);
    let mut tokens = pipeline.next().unwrap_or_default().split_whitespace();
    let function = match tokens.next() {
        Some("random") => Function::Random(parse_number(template, tokens.next())?),
        Some("unix_time") => Function::UnixTime,
        Some("role_name") => Function::RoleName,
        Some("cloud") => Function::Cloud,
        Some(other) => return Err(invalid(template, format!("unknown function `{other}`"))),
        None => return Err(invalid(template, "empty expression")),
    };
    if tokens.next().is_some() {
        return Err(invalid(template, "unexpected function argument"));
    }

    let mut filters = Vec::new();
    for filter in pipeline {
        let mut tokens = filter.split_whitespace();
        filters.push(match tokens.next() {
            Some("lowercase") => Filter::Lowercase,
            Some("uppercase") => Filter::Uppercase,
            Some("truncate") => Filter::Truncate(parse_number(template, tokens.next())?),
            Some(other) => return Err(invalid(template, format!("unknown filter `{other}`"))),
            None => return Err(invalid(template, "empty filter")),
        });
        if tokens.next().is_some() {
            return Err(invalid(template, "unexpected filter argument"));
        }
    }
    Ok(Part::Expression(function, filters))
}

impl UsernameTemplate {
    /// Parse the template.
    pub fn parse(template: &str) -> Result<Self, CloudProviderError> {
        let re = Regex::new(r"\{\{(.*?)\}\}").map_err(|err| invalid(template, err.to_string()))?;
        let mut parts = Vec::new();
        let mut last = 0;
        for capture in re.captures_iter(template) {
            let (Some(whole), Some(expression)) = (capture.get(0), capture.get(1)) else {
                continue;
            };
            if whole.start() > last {
                parts.push(parse_literal(template, &template[last..whole.start()])?);
            }
            parts.push(parse_expression(template, expression.as_str())?);
            last = whole.end();
        }
        if last < template.len() {
            parts.push(parse_literal(template, &template[last..])?);
        }
        if parts.is_empty() {
            return Err(invalid(template, "template is empty"));
        }
        Ok(Self { parts })
    }

    /// Render the user name.
    pub fn render(&self, ctx: TemplateContext<'_>) -> String {
        let mut name = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => name.push_str(text),
                Part::Expression(function, filters) => {
                    let mut val = match function {
                        Function::Random(len) => random_string(NAME_CHARSET, *len),
                        Function::UnixTime => Utc::now().timestamp().to_string(),
                        Function::RoleName => ctx.role_name.to_string(),
                        Function::Cloud => ctx.cloud.to_string(),
                    };
                    for filter in filters {
                        val = match filter {
                            Filter::Lowercase => val.to_lowercase(),
                            Filter::Uppercase => val.to_uppercase(),
                            Filter::Truncate(len) => val.chars().take(*len).collect(),
                        };
                    }
                    name.push_str(&val);
                }
            }
        }
        name.chars().take(MAX_USERNAME_LENGTH).collect()
    }
}
