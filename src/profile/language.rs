// Copyright 2025 Cowboy AI, LLC.

//! Languages spoken by a user

use crate::errors::DomainResult;
use crate::validation::{element_code, validate_nullable_string};
use serde::{Deserialize, Serialize};

/// Proficiency on a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageLevel {
    /// Basic user
    A,
    /// Independent user
    B,
    /// Proficient user
    C,
}

/// A language the user understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Name of the language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ISO 639-1 code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Proficiency level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LanguageLevel>,
}

impl Language {
    /// Language with the given code and level
    pub fn new(code: impl Into<String>, level: LanguageLevel) -> Self {
        Self {
            name: None,
            code: Some(code.into()),
            level: Some(level),
        }
    }

    /// Check the name and code lengths
    pub fn validate(self, prefix: &str) -> DomainResult<Self> {
        Ok(Self {
            name: validate_nullable_string(prefix, "name", 255, self.name)?,
            code: validate_nullable_string(prefix, "code", 2, self.code)?,
            level: self.level,
        })
    }
}

/// Validate every language under `<prefix>[i]`
pub fn validate_languages(languages: Vec<Language>, prefix: &str) -> DomainResult<Vec<Language>> {
    languages
        .into_iter()
        .enumerate()
        .map(|(index, language)| language.validate(&element_code(prefix, index)))
        .collect()
}
