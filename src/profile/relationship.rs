// Copyright 2025 Cowboy AI, LLC.

//! Social network relationships between users

use crate::errors::{DomainError, DomainResult};
use crate::merge::require_profile;
use crate::persistence::ProfileStore;
use crate::validation::{element_code, field_code, validate_nullable_string};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// Relatives
    Family,
    /// Friends
    Friend,
    /// Work mates
    Colleague,
    /// People who know of each other
    Acquaintance,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipType::Family => "family",
            RelationshipType::Friend => "friend",
            RelationshipType::Colleague => "colleague",
            RelationshipType::Acquaintance => "acquaintance",
        };
        f.write_str(name)
    }
}

/// A directed relationship with another user
///
/// The pair `(user_id, relationship_type)` identifies the relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialNetworkRelationship {
    /// Profile id of the other user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Kind of relationship
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
}

impl SocialNetworkRelationship {
    /// Relationship of `relationship_type` with `user_id`
    pub fn new(user_id: impl Into<String>, relationship_type: RelationshipType) -> Self {
        Self {
            user_id: Some(user_id.into()),
            relationship_type: Some(relationship_type),
        }
    }

    /// Check both parts are present
    pub fn validate(self, prefix: &str) -> DomainResult<Self> {
        let user_id = validate_nullable_string(prefix, "userId", 255, self.user_id)?;
        if user_id.is_none() {
            return Err(DomainError::validation(
                field_code(prefix, "userId"),
                "You must to define the user of the relationship.",
            ));
        }
        if self.relationship_type.is_none() {
            return Err(DomainError::validation(
                field_code(prefix, "type"),
                "You must to define the type of the relationship.",
            ));
        }
        Ok(Self {
            user_id,
            relationship_type: self.relationship_type,
        })
    }

    /// Whether it is a relationship of `relationship_type` with `user_id`
    pub fn is(&self, user_id: &str, relationship_type: RelationshipType) -> bool {
        self.user_id.as_deref() == Some(user_id) && self.relationship_type == Some(relationship_type)
    }
}

/// Validate a list of relationships
///
/// Each element is checked, then compared with the earlier ones, and then its
/// user is looked up in the store, one element after the other.
pub async fn validate_relationships(
    relationships: Vec<SocialNetworkRelationship>,
    prefix: &str,
    profiles: &dyn ProfileStore,
) -> DomainResult<Vec<SocialNetworkRelationship>> {
    let mut validated: Vec<SocialNetworkRelationship> = Vec::with_capacity(relationships.len());
    for (index, relationship) in relationships.into_iter().enumerate() {
        let code = element_code(prefix, index);
        let relationship = relationship.validate(&code)?;
        if validated.contains(&relationship) {
            return Err(DomainError::validation(code, "Duplicated relationship."));
        }
        if let Some(user_id) = relationship.user_id.as_deref() {
            require_profile(profiles, user_id, field_code(&code, "userId")).await?;
        }
        validated.push(relationship);
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryProfileStore;
    use crate::profile::UserProfile;

    async fn store_with(ids: &[&str]) -> InMemoryProfileStore {
        let store = InMemoryProfileStore::new();
        for id in ids {
            store.store_profile(UserProfile::with_id(*id)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_duplicate_fails_at_second_index() {
        let store = store_with(&["U1"]).await;
        let error = validate_relationships(
            vec![
                SocialNetworkRelationship::new("U1", RelationshipType::Friend),
                SocialNetworkRelationship::new("U1", RelationshipType::Friend),
            ],
            "profile.relationships",
            &store,
        )
        .await
        .unwrap_err();
        assert_eq!(error.code(), Some("profile.relationships[1]"));
    }

    #[tokio::test]
    async fn test_same_user_other_type_is_allowed() {
        let store = store_with(&["U1"]).await;
        let validated = validate_relationships(
            vec![
                SocialNetworkRelationship::new("U1", RelationshipType::Friend),
                SocialNetworkRelationship::new(" U1 ", RelationshipType::Colleague),
            ],
            "profile.relationships",
            &store,
        )
        .await
        .unwrap();
        assert!(validated[1].is("U1", RelationshipType::Colleague));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = store_with(&["U1"]).await;
        let error = validate_relationships(
            vec![
                SocialNetworkRelationship::new("U1", RelationshipType::Family),
                SocialNetworkRelationship::new("U2", RelationshipType::Family),
            ],
            "profile.relationships",
            &store,
        )
        .await
        .unwrap_err();
        assert_eq!(error.code(), Some("profile.relationships[1].userId"));
    }

    #[test]
    fn test_both_parts_required() {
        let missing_type = SocialNetworkRelationship {
            user_id: Some("U1".into()),
            relationship_type: None,
        };
        assert_eq!(missing_type.validate("r").unwrap_err().code(), Some("r.type"));
        let missing_user = SocialNetworkRelationship {
            user_id: Some("  ".into()),
            relationship_type: Some(RelationshipType::Friend),
        };
        assert_eq!(missing_user.validate("r").unwrap_err().code(), Some("r.userId"));
    }

    #[test]
    fn test_json_uses_type_key() {
        let json = serde_json::to_value(SocialNetworkRelationship::new("U1", RelationshipType::Acquaintance)).unwrap();
        assert_eq!(json, serde_json::json!({ "userId": "U1", "type": "acquaintance" }));
    }
}
