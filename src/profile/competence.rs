// Copyright 2025 Cowboy AI, LLC.

//! Competences a user has

use crate::errors::DomainResult;
use crate::merge::{MergeableEntity, ValidationContext};
use crate::validation::validate_nullable_string;
use serde::{Deserialize, Serialize};

/// What kind of competence it is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CompetenceKind {
    /// Competence with no extra attributes
    #[default]
    Generic,
    /// Permission to drive
    #[serde(rename_all = "camelCase")]
    DrivingLicense {
        /// Number of the licence
        #[serde(default, skip_serializing_if = "Option::is_none")]
        driving_license_id: Option<String>,
    },
}

/// A competence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competence {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Kind specific attributes
    #[serde(flatten)]
    pub kind: CompetenceKind,
}

impl Competence {
    /// A driving licence without id
    pub fn driving_license(driving_license_id: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: CompetenceKind::DrivingLicense {
                driving_license_id: Some(driving_license_id.into()),
            },
        }
    }
}

impl MergeableEntity for Competence {
    const ENTITY_NAME: &'static str = "competence";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        let kind = match self.kind {
            CompetenceKind::Generic => CompetenceKind::Generic,
            CompetenceKind::DrivingLicense { driving_license_id } => {
                CompetenceKind::DrivingLicense {
                    driving_license_id: validate_nullable_string(
                        prefix,
                        "drivingLicenseId",
                        255,
                        driving_license_id,
                    )?,
                }
            }
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
                CompetenceKind::DrivingLicense { driving_license_id },
                CompetenceKind::DrivingLicense {
                    driving_license_id: source_id,
                },
            ) => CompetenceKind::DrivingLicense {
                driving_license_id: source_id.or_else(|| driving_license_id.clone()),
            },
            (CompetenceKind::Generic, CompetenceKind::Generic) => CompetenceKind::Generic,
            (_, kind) => kind,
        };
        Ok(Self {
            id: self.id.clone(),
            kind,
        })
    }
}
