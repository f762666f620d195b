// Copyright 2025 Cowboy AI, LLC.

//! Communities of users
//!
//! A community lives inside an application and groups members that share
//! norms and social practices. Unlike profiles, validating or merging a
//! community never queries a store.

use crate::errors::{DomainError, DomainResult};
use crate::merge::{ensure_unique, merge_list_field, validate_list, Identity, ValidationContext};
use crate::profile::{Norm, SocialPractice};
use crate::validation::{element_code, field_code, validate_nullable_string, validate_string};
use serde::{Deserialize, Serialize};

/// A user that belongs to a community
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    /// Profile id of the member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// What the member is allowed to do
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileges: Option<Vec<String>>,
}

impl CommunityMember {
    /// Member without privileges
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            privileges: None,
        }
    }

    /// Member with the given privileges
    pub fn with_privileges<I, S>(user_id: impl Into<String>, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: Some(user_id.into()),
            privileges: Some(privileges.into_iter().map(Into::into).collect()),
        }
    }

    /// Check the user id is present and trim the privileges
    pub fn validate(self, prefix: &str) -> DomainResult<Self> {
        let user_id = validate_string(prefix, "userId", 255, self.user_id)?;
        let privileges = self
            .privileges
            .map(|privileges| validate_words(privileges, prefix, "privileges"))
            .transpose()?;
        Ok(Self {
            user_id: Some(user_id),
            privileges,
        })
    }
}

/// Trim every word of the list at `<prefix>.<field>` and drop the blank ones
fn validate_words(words: Vec<String>, prefix: &str, field: &str) -> DomainResult<Vec<String>> {
    let mut validated = Vec::with_capacity(words.len());
    for (index, word) in words.into_iter().enumerate() {
        if let Some(word) =
            validate_nullable_string(prefix, &element_code(field, index), 255, Some(word))?
        {
            validated.push(word);
        }
    }
    Ok(validated)
}

/// A community of users inside an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityProfile {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Application the community belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Name of the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What the community is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Words that describe the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Users in the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<CommunityMember>>,
    /// Norms of the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norms: Option<Vec<Norm>>,
    /// Social practices of the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_practices: Option<Vec<SocialPractice>>,
    /// Epoch seconds of the creation
    #[serde(default, rename = "_creationTs")]
    pub creation_ts: i64,
    /// Epoch seconds of the last update
    #[serde(default, rename = "_lastUpdateTs")]
    pub last_update_ts: i64,
}

impl CommunityProfile {
    /// Community named `name` in the application `app_id`
    pub fn new(app_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Whether `user_id` is a member
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members
            .iter()
            .flatten()
            .any(|member| member.user_id.as_deref() == Some(user_id))
    }

    /// Validate the community, generating the missing ids
    pub fn validate(self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.validate_as(Identity::Keep, prefix, ctx)
    }

    /// Validate a community that is being created
    pub fn validate_new(self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.validate_as(Identity::Fresh, prefix, ctx)
    }

    /// Validate under the given identity rule
    pub fn validate_as(
        self,
        identity: Identity,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        let supplied = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        if supplied.is_some() && identity == Identity::Fresh {
            return Err(DomainError::validation(
                field_code(prefix, "id"),
                "You can not specify the identifier of the community to create",
            ));
        }
        let mut community = self.validate_scalars(prefix)?;
        community.id = Some(supplied.unwrap_or_else(|| ctx.next_id()));
        community.norms = community
            .norms
            .map(|norms| validate_list(norms, identity, &field_code(prefix, "norms"), ctx))
            .transpose()?;
        community.social_practices = community
            .social_practices
            .map(|practices| {
                validate_list(practices, identity, &field_code(prefix, "socialPractices"), ctx)
            })
            .transpose()?;
        Ok(community)
    }

    fn validate_scalars(mut self, prefix: &str) -> DomainResult<Self> {
        self.app_id = validate_nullable_string(prefix, "appId", 255, self.app_id)?;
        self.name = validate_nullable_string(prefix, "name", 255, self.name)?;
        self.description = validate_nullable_string(prefix, "description", 1023, self.description)?;
        self.keywords = self
            .keywords
            .map(|keywords| validate_words(keywords, prefix, "keywords"))
            .transpose()?;
        if let Some(members) = self.members.take() {
            let code = field_code(prefix, "members");
            let members = members
                .into_iter()
                .enumerate()
                .map(|(index, member)| member.validate(&element_code(&code, index)))
                .collect::<DomainResult<Vec<_>>>()?;
            ensure_unique(&members, &code, Some("userId"), "Duplicated member.", |member| {
                member.user_id.clone()
            })?;
            self.members = Some(members);
        }
        Ok(self)
    }

    /// Merge `source` over the community
    ///
    /// Members are replaced when present. A member that was already in the
    /// community keeps its privileges unless the source sends new ones.
    pub fn merge(
        &self,
        source: CommunityProfile,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        let members = source.members.map(|members| {
            members
                .into_iter()
                .map(|member| {
                    let user_id = member.user_id.as_deref().map(str::trim);
                    let stored = self.members.iter().flatten().find(|current| {
                        let current_id = current.user_id.as_deref().map(str::trim);
                        current_id.is_some_and(|id| !id.is_empty()) && current_id == user_id
                    });
                    match stored {
                        Some(stored) => CommunityMember {
                            user_id: member.user_id,
                            privileges: member.privileges.or_else(|| stored.privileges.clone()),
                        },
                        None => member,
                    }
                })
                .collect()
        });
        let scalars = CommunityProfile {
            id: self.id.clone(),
            app_id: source.app_id.or_else(|| self.app_id.clone()),
            name: source.name.or_else(|| self.name.clone()),
            description: source.description.or_else(|| self.description.clone()),
            keywords: source.keywords.or_else(|| self.keywords.clone()),
            members: members.or_else(|| self.members.clone()),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
            ..Default::default()
        };
        let mut merged = scalars.validate_scalars(prefix)?;
        merged.norms = merge_list_field(&self.norms, source.norms, &field_code(prefix, "norms"), ctx)?;
        merged.social_practices = merge_list_field(
            &self.social_practices,
            source.social_practices,
            &field_code(prefix, "socialPractices"),
            ctx,
        )?;
        Ok(merged)
    }

    /// Replace every client field, keeping the id and timestamps
    pub fn replace(
        &self,
        source: CommunityProfile,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        CommunityProfile {
            id: self.id.clone(),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
            ..source
        }
        .validate(prefix, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::identifiers::SequentialIdGenerator;
    use crate::merge::UNKNOWN_ENTITY_MESSAGE;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn context() -> ValidationContext {
        ValidationContext::new(
            Arc::new(SequentialIdGenerator::new("c")),
            Arc::new(FixedClock::at(0)),
        )
    }

    fn stored() -> CommunityProfile {
        CommunityProfile {
            description: Some("People who share cars".into()),
            keywords: Some(vec![" cars ".into(), "".into(), "sharing".into()]),
            members: Some(vec![
                CommunityMember::with_privileges("1", ["admin"]),
                CommunityMember::new("2"),
            ]),
            norms: Some(vec![Norm::new("smoking", "no")]),
            social_practices: Some(vec![SocialPractice::new("carpooling")]),
            ..CommunityProfile::new("app", "Car poolers")
        }
        .validate_new("community", &context())
        .unwrap()
    }

    #[test]
    fn test_validate_drops_blank_keywords() {
        let community = stored();
        assert_eq!(
            community.keywords,
            Some(vec!["cars".to_string(), "sharing".to_string()])
        );
        assert!(community.has_member("2"));
        assert!(community.norms.unwrap()[0].id.is_some());
    }

    #[test]
    fn test_duplicated_member() {
        let error = CommunityProfile {
            members: Some(vec![
                CommunityMember::new("1"),
                CommunityMember::new("2"),
                CommunityMember::new(" 1 "),
            ]),
            ..Default::default()
        }
        .validate("community", &context())
        .unwrap_err();
        assert_eq!(error.code(), Some("community.members[2].userId"));
    }

    #[test]
    fn test_member_requires_user() {
        let error = CommunityProfile {
            members: Some(vec![CommunityMember::default()]),
            ..Default::default()
        }
        .validate("community", &context())
        .unwrap_err();
        assert_eq!(error.code(), Some("community.members[0].userId"));
    }

    #[test]
    fn test_description_limit() {
        let error = CommunityProfile {
            description: Some("d".repeat(1024)),
            ..Default::default()
        }
        .validate("community", &context())
        .unwrap_err();
        assert_eq!(error.code(), Some("community.description"));
    }

    #[test]
    fn test_merge_members_keep_privileges() {
        let ctx = context();
        let current = stored();
        let source = CommunityProfile {
            members: Some(vec![CommunityMember::new("1"), CommunityMember::new("3")]),
            ..Default::default()
        };
        let merged = current.merge(source, "community", &ctx).unwrap();
        assert_eq!(
            merged.members,
            Some(vec![
                CommunityMember::with_privileges("1", ["admin"]),
                CommunityMember::new("3"),
            ])
        );
        assert_eq!(merged.name, current.name);
        assert_eq!(merged.norms, current.norms);
        assert_eq!(merged.id, current.id);
    }

    #[test]
    fn test_merge_members_match_trimmed_ids() {
        let ctx = context();
        let source = CommunityProfile {
            members: Some(vec![CommunityMember::new(" 1 ")]),
            ..Default::default()
        };
        let merged = stored().merge(source, "community", &ctx).unwrap();
        assert_eq!(
            merged.members,
            Some(vec![CommunityMember::with_privileges("1", ["admin"])])
        );
    }

    #[test]
    fn test_merge_norms_by_id() {
        let ctx = context();
        let current = stored();
        let norm_id = current.norms.as_ref().unwrap()[0].id.clone();
        let source = CommunityProfile {
            norms: Some(vec![
                Norm::new("pets", "yes"),
                Norm {
                    id: norm_id.clone(),
                    negation: Some(false),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let merged = current.merge(source, "community", &ctx).unwrap();
        let norms = merged.norms.unwrap();
        assert_eq!(norms[1].id, norm_id);
        assert_eq!(norms[1].attribute.as_deref(), Some("smoking"));
        assert!(!norms[1].is_negated());
    }

    #[test]
    fn test_merge_unknown_practice() {
        let ctx = context();
        let source = CommunityProfile {
            social_practices: Some(vec![SocialPractice {
                id: Some("undefined".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let error = stored().merge(source, "community", &ctx).unwrap_err();
        assert_eq!(error.code(), Some("community.socialPractices[0].id"));
        assert!(error.to_string().contains(UNKNOWN_ENTITY_MESSAGE));
    }

    #[test]
    fn test_replace() {
        let ctx = context();
        let current = stored();
        let replaced = current
            .replace(CommunityProfile::new("app2", "Walkers"), "community", &ctx)
            .unwrap();
        assert_eq!(replaced.id, current.id);
        assert_eq!(replaced.app_id.as_deref(), Some("app2"));
        assert_eq!(replaced.members, None);
    }
}
