// Copyright 2025 Cowboy AI, LLC.

//! Name of a user

use crate::errors::DomainResult;
use crate::validation::validate_nullable_string;
use serde::{Deserialize, Serialize};

/// The parts of a user name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    /// Title such as `Mr.` or `Dr.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Middle name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    /// Suffix such as `Jr.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl UserName {
    /// Name with first and last parts
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: Some(first.into()),
            last: Some(last.into()),
            ..Default::default()
        }
    }

    /// Check the length of every part
    pub fn validate(self, prefix: &str) -> DomainResult<Self> {
        Ok(Self {
            prefix: validate_nullable_string(prefix, "prefix", 10, self.prefix)?,
            first: validate_nullable_string(prefix, "first", 255, self.first)?,
            middle: validate_nullable_string(prefix, "middle", 255, self.middle)?,
            last: validate_nullable_string(prefix, "last", 255, self.last)?,
            suffix: validate_nullable_string(prefix, "suffix", 10, self.suffix)?,
        })
    }

    /// Overlay the present parts of `source` and validate the result
    pub fn merge(&self, source: Option<Self>, prefix: &str) -> DomainResult<Self> {
        let Some(source) = source else {
            return Ok(self.clone());
        };
        Self {
            prefix: source.prefix.or_else(|| self.prefix.clone()),
            first: source.first.or_else(|| self.first.clone()),
            middle: source.middle.or_else(|| self.middle.clone()),
            last: source.last.or_else(|| self.last.clone()),
            suffix: source.suffix.or_else(|| self.suffix.clone()),
        }
        .validate(prefix)
    }
}
