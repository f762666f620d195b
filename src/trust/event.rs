// Copyright 2025 Cowboy AI, LLC.

//! Reports of how a user performed for another user

use crate::errors::{DomainError, DomainResult};
use crate::persistence::ProfileStore;
use crate::profile::RelationshipType;
use crate::validation::{field_code, validate_nullable_string, validate_range, validate_string};
use serde::{Deserialize, Serialize};

/// A rating one user gave about another
///
/// Events are append-only: once stored they are never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustEvent {
    /// User that reports the rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// User that is rated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Relationship the source has with the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipType>,
    /// Application where the interaction happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Community where the interaction happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    /// Type of the task the interaction was about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type_id: Option<String>,
    /// Task the interaction was about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Rating in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Epoch seconds when the event was stored
    #[serde(default)]
    pub report_time: i64,
}

impl TrustEvent {
    /// Rating of `target_id` by `source_id`
    pub fn rating(source_id: impl Into<String>, target_id: impl Into<String>, rating: f64) -> Self {
        Self {
            source_id: Some(source_id.into()),
            target_id: Some(target_id.into()),
            rating: Some(rating),
            ..Default::default()
        }
    }

    /// Check the event fields and the users it refers to
    ///
    /// The source profile is looked up before the target one.
    pub async fn validate(self, prefix: &str, profiles: &dyn ProfileStore) -> DomainResult<Self> {
        let source_id = validate_string(prefix, "sourceId", 255, self.source_id)?;
        let target_id = validate_string(prefix, "targetId", 255, self.target_id)?;
        let app_id = validate_nullable_string(prefix, "appId", 255, self.app_id)?;
        let community_id = validate_nullable_string(prefix, "communityId", 255, self.community_id)?;
        let task_type_id = validate_nullable_string(prefix, "taskTypeId", 255, self.task_type_id)?;
        let task_id = validate_nullable_string(prefix, "taskId", 255, self.task_id)?;
        let rating = validate_range(prefix, "rating", 0.0, 1.0, self.rating)?;
        if rating.is_none() {
            return Err(DomainError::validation(
                field_code(prefix, "rating"),
                "You must to define the rating.",
            ));
        }
        if source_id == target_id {
            return Err(DomainError::validation(
                field_code(prefix, "targetId"),
                "The source and the target can not be the same user.",
            ));
        }

        let Some(source) = profiles.find_profile_by_id(&source_id).await? else {
            return Err(DomainError::validation(
                field_code(prefix, "sourceId"),
                format!("does not exist a profile with id '{source_id}'"),
            ));
        };
        if profiles.find_profile_by_id(&target_id).await?.is_none() {
            return Err(DomainError::validation(
                field_code(prefix, "targetId"),
                format!("does not exist a profile with id '{target_id}'"),
            ));
        }
        if let Some(relationship) = self.relationship {
            if !source.has_relationship(&target_id, relationship) {
                return Err(DomainError::validation(
                    field_code(prefix, "relationship"),
                    format!("The user '{source_id}' has not a '{relationship}' relationship with '{target_id}'."),
                ));
            }
        }

        Ok(Self {
            source_id: Some(source_id),
            target_id: Some(target_id),
            relationship: self.relationship,
            app_id,
            community_id,
            task_type_id,
            task_id,
            rating,
            report_time: self.report_time,
        })
    }
}
