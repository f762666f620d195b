// Copyright 2025 Cowboy AI, LLC.

//! Material resources a user owns

use crate::errors::DomainResult;
use crate::merge::{MergeableEntity, ValidationContext};
use crate::validation::validate_nullable_string;
use serde::{Deserialize, Serialize};

/// What kind of material it is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MaterialKind {
    /// Material with no extra attributes
    #[default]
    Generic,
    /// A car the user can drive
    #[serde(rename_all = "camelCase")]
    Car {
        /// Registration plate
        #[serde(default, skip_serializing_if = "Option::is_none")]
        car_plate: Option<String>,
        /// Model or category of the car
        #[serde(default, skip_serializing_if = "Option::is_none")]
        car_type: Option<String>,
    },
}

/// A material resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Kind specific attributes
    #[serde(flatten)]
    pub kind: MaterialKind,
}

impl Material {
    /// A car without id
    pub fn car(car_plate: impl Into<String>, car_type: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: MaterialKind::Car {
                car_plate: Some(car_plate.into()),
                car_type: Some(car_type.into()),
            },
        }
    }
}

impl MergeableEntity for Material {
    const ENTITY_NAME: &'static str = "material";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        let kind = match self.kind {
            MaterialKind::Generic => MaterialKind::Generic,
            MaterialKind::Car {
                car_plate,
                car_type,
            } => MaterialKind::Car {
                car_plate: validate_nullable_string(prefix, "carPlate", 255, car_plate)?,
                car_type: validate_nullable_string(prefix, "carType", 255, car_type)?,
            },
        };
        Ok(Self { id: self.id, kind })
    }

    fn merge_fields(
        &self,
        source: Self,
        _prefix: &str,
        _ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        let kind = match (&self.kind, source.kind) {
            (
                MaterialKind::Car {
                    car_plate,
                    car_type,
                },
                MaterialKind::Car {
                    car_plate: source_plate,
                    car_type: source_type,
                },
            ) => MaterialKind::Car {
                car_plate: source_plate.or_else(|| car_plate.clone()),
                car_type: source_type.or_else(|| car_type.clone()),
            },
            (MaterialKind::Generic, MaterialKind::Generic) => MaterialKind::Generic,
            // A different kind replaces the stored one
            (_, kind) => kind,
        };
        Ok(Self {
            id: self.id.clone(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_same_kind_by_field() {
        let ctx = ValidationContext::system();
        let current = Material::car("1234ABC", "sedan").validate("m", &ctx).unwrap();
        let source = Material {
            id: None,
            kind: MaterialKind::Car {
                car_plate: None,
                car_type: Some("van".into()),
            },
        };
        let merged = current.merge(Some(source), "m", &ctx).unwrap();
        assert_eq!(merged.id, current.id);
        assert_eq!(
            merged.kind,
            MaterialKind::Car {
                car_plate: Some("1234ABC".into()),
                car_type: Some("van".into()),
            }
        );
    }

    #[test]
    fn test_merge_other_kind_replaces() {
        let ctx = ValidationContext::system();
        let current = Material::car("1234ABC", "sedan").validate("m", &ctx).unwrap();
        let merged = current.merge(Some(Material::default()), "m", &ctx).unwrap();
        assert_eq!(merged.kind, MaterialKind::Generic);
        assert_eq!(merged.id, current.id);
    }

    #[test]
    fn test_car_fields_validated() {
        let ctx = ValidationContext::system();
        let error = Material::car("p".repeat(256), "sedan")
            .validate("profile.materials[0]", &ctx)
            .unwrap_err();
        assert_eq!(error.code(), Some("profile.materials[0].carPlate"));
    }

    #[test]
    fn test_tagged_json() {
        let material: Material =
            serde_json::from_str(r#"{"id":"1","type":"car","carPlate":"X","carType":"Y"}"#)
                .unwrap();
        assert_eq!(material.id.as_deref(), Some("1"));
        assert!(matches!(material.kind, MaterialKind::Car { .. }));
        let json = serde_json::to_value(Material::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "generic" }));
    }
}
