// Copyright 2025 Cowboy AI, LLC.

//! Norms a user or a community follows

use crate::errors::DomainResult;
use crate::merge::{MergeableEntity, ValidationContext};
use crate::validation::validate_nullable_string;
use serde::{Deserialize, Serialize};

/// How an attribute is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormOperator {
    /// Attribute equals the comparison
    Equals,
    /// Attribute is less than the comparison
    LessThan,
    /// Attribute is greater than the comparison
    GreaterThan,
    /// Attribute is less than or equal to the comparison
    LessEqualsThan,
    /// Attribute is greater than or equal to the comparison
    GreaterEqualsThan,
}

/// A rule of behaviour: `attribute operator comparison`, optionally negated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attribute the norm is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Comparison operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<NormOperator>,
    /// Value compared with the attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    /// Whether the norm is a prohibition. Unset means `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negation: Option<bool>,
}

impl Norm {
    /// Norm `attribute EQUALS comparison` without id
    pub fn new(attribute: impl Into<String>, comparison: impl Into<String>) -> Self {
        Self {
            id: None,
            attribute: Some(attribute.into()),
            operator: Some(NormOperator::Equals),
            comparison: Some(comparison.into()),
            negation: None,
        }
    }

    /// Effective negation flag
    pub fn is_negated(&self) -> bool {
        self.negation.unwrap_or(true)
    }
}

impl MergeableEntity for Norm {
    const ENTITY_NAME: &'static str = "norm";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(mut self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        self.attribute = validate_nullable_string(prefix, "attribute", 255, self.attribute)?;
        self.comparison = validate_nullable_string(prefix, "comparison", 255, self.comparison)?;
        Ok(self)
    }

    fn merge_fields(
        &self,
        source: Self,
        _prefix: &str,
        _ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: self.id.clone(),
            attribute: source.attribute.or_else(|| self.attribute.clone()),
            operator: source.operator.or(self.operator),
            comparison: source.comparison.or_else(|| self.comparison.clone()),
            negation: source.negation.or(self.negation),
        })
    }
}
