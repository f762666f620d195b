// Copyright 2025 Cowboy AI, LLC.

//! Personal behaviours: what a user habitually does and when

use crate::errors::DomainResult;
use crate::merge::{MergeableEntity, ValidationContext};
use crate::validation::{validate_nullable_string, validate_nullable_time};
use serde::{Deserialize, Serialize};

/// A recurrent behaviour of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the routine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Where the routine happens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<String>,
    /// Starting time, ISO-8601 local time
    #[serde(default, rename = "from_time", skip_serializing_if = "Option::is_none")]
    pub from_time: Option<String>,
    /// Ending time, ISO-8601 local time
    #[serde(default, rename = "to_time", skip_serializing_if = "Option::is_none")]
    pub to_time: Option<String>,
}

impl MergeableEntity for Routine {
    const ENTITY_NAME: &'static str = "routine";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(mut self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        self.label = validate_nullable_string(prefix, "label", 255, self.label)?;
        self.proximity = validate_nullable_string(prefix, "proximity", 255, self.proximity)?;
        self.from_time = validate_nullable_time(prefix, "from_time", self.from_time)?;
        self.to_time = validate_nullable_time(prefix, "to_time", self.to_time)?;
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
            label: source.label.or_else(|| self.label.clone()),
            proximity: source.proximity.or_else(|| self.proximity.clone()),
            from_time: source.from_time.or_else(|| self.from_time.clone()),
            to_time: source.to_time.or_else(|| self.to_time.clone()),
        })
    }
}
