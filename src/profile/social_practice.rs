// Copyright 2025 Cowboy AI, LLC.

//! Social practices: the materials, competences and norms behind an activity

use crate::errors::DomainResult;
use crate::merge::{
    merge_list_field, merge_optional, validate_list, Identity, MergeableEntity, ValidationContext,
};
use crate::profile::{Competence, Material, Norm};
use crate::validation::{field_code, validate_nullable_string};
use serde::{Deserialize, Serialize};

/// A social practice of a user or a community
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPractice {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Material needed by the practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Material>,
    /// Competence needed by the practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competences: Option<Competence>,
    /// Norms that rule the practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norms: Option<Vec<Norm>>,
}

impl SocialPractice {
    /// Practice with a label and nothing else
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }
}

impl MergeableEntity for SocialPractice {
    const ENTITY_NAME: &'static str = "social practice";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(mut self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.label = validate_nullable_string(prefix, "label", 255, self.label)?;
        self.competences = self
            .competences
            .map(|competence| competence.validate(&field_code(prefix, "competences"), ctx))
            .transpose()?;
        self.materials = self
            .materials
            .map(|material| material.validate(&field_code(prefix, "materials"), ctx))
            .transpose()?;
        self.norms = self
            .norms
            .map(|norms| validate_list(norms, Identity::Keep, &field_code(prefix, "norms"), ctx))
            .transpose()?;
        Ok(self)
    }

    fn merge_fields(
        &self,
        source: Self,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: self.id.clone(),
            label: source.label.or_else(|| self.label.clone()),
            materials: merge_optional(
                self.materials.as_ref(),
                source.materials,
                &field_code(prefix, "materials"),
                ctx,
            )?,
            competences: merge_optional(
                self.competences.as_ref(),
                source.competences,
                &field_code(prefix, "competences"),
                ctx,
            )?,
            norms: merge_list_field(&self.norms, source.norms, &field_code(prefix, "norms"), ctx)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::SequentialIdGenerator;
    use crate::clock::FixedClock;
    use crate::profile::MaterialKind;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn context() -> ValidationContext {
        ValidationContext::new(
            Arc::new(SequentialIdGenerator::new("sp")),
            Arc::new(FixedClock::at(0)),
        )
    }

    fn stored() -> SocialPractice {
        SocialPractice {
            materials: Some(Material::car("1234ABC", "sedan")),
            norms: Some(vec![Norm::new("speed", "120")]),
            ..SocialPractice::new("carpooling")
        }
        .validate("practice", &context())
        .unwrap()
    }

    #[test]
    fn test_validate_assigns_nested_ids() {
        let practice = stored();
        assert!(practice.id.is_some());
        assert!(practice.materials.as_ref().and_then(|m| m.id.as_ref()).is_some());
        assert!(practice.norms.as_ref().unwrap()[0].id.is_some());
    }

    #[test]
    fn test_merge_nested_norms_by_id() {
        let ctx = context();
        let current = stored();
        let norm_id = current.norms.as_ref().unwrap()[0].id.clone();
        let source = SocialPractice {
            norms: Some(vec![
                Norm {
                    id: norm_id.clone(),
                    comparison: Some("100".into()),
                    ..Default::default()
                },
                Norm::new("smoking", "no"),
            ]),
            ..Default::default()
        };
        let merged = current.merge(Some(source), "practice", &ctx).unwrap();
        let norms = merged.norms.unwrap();
        assert_eq!(norms.len(), 2);
        assert_eq!(norms[0].id, norm_id);
        assert_eq!(norms[0].attribute.as_deref(), Some("speed"));
        assert_eq!(norms[0].comparison.as_deref(), Some("100"));
        assert!(norms[1].id.is_some());
        assert_eq!(merged.label.as_deref(), Some("carpooling"));
        assert!(matches!(merged.materials.unwrap().kind, MaterialKind::Car { .. }));
    }

    #[test]
    fn test_merge_unknown_nested_norm() {
        let ctx = context();
        let source = SocialPractice {
            norms: Some(vec![Norm {
                id: Some("missing".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let error = stored().merge(Some(source), "profile.socialPractices[0]", &ctx).unwrap_err();
        assert_eq!(error.code(), Some("profile.socialPractices[0].norms[0].id"));
    }
}
