// Copyright 2025 Cowboy AI, LLC.

//! Places relevant for a user

use crate::errors::DomainResult;
use crate::merge::{MergeableEntity, ValidationContext};
use crate::validation::{validate_nullable_string, validate_range};
use serde::{Deserialize, Serialize};

/// A labelled point on the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevantLocation {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the place, for example `Home`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Degrees in [-90, 90]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Degrees in [-180, 180]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl RelevantLocation {
    /// Location without id
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: None,
            label: Some(label.into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

impl MergeableEntity for RelevantLocation {
    const ENTITY_NAME: &'static str = "relevant location";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(mut self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        self.label = validate_nullable_string(prefix, "label", 255, self.label)?;
        self.latitude = validate_range(prefix, "latitude", -90.0, 90.0, self.latitude)?;
        self.longitude = validate_range(prefix, "longitude", -180.0, 180.0, self.longitude)?;
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
            latitude: source.latitude.or(self.latitude),
            longitude: source.longitude.or(self.longitude),
        })
    }
}
