// Copyright 2025 Cowboy AI, LLC.

//! User profiles
//!
//! A [`UserProfile`] is the root document describing a user. It owns lists
//! of identity-bearing entities (norms, locations, activities, ...) that are
//! reconciled with [`crate::merge::merge_list`] when the profile is merged,
//! and references to other profiles (relationships, activity attendees) that
//! are checked against a [`ProfileStore`].

mod competence;
mod date;
mod historic;
mod language;
mod location;
mod material;
mod name;
mod norm;
mod planned_activity;
mod relationship;
mod routine;
mod social_practice;

pub use competence::{Competence, CompetenceKind};
pub use date::{ProfileDate, MIN_BIRTH_DATE};
pub use historic::HistoricProfile;
pub use language::{validate_languages, Language, LanguageLevel};
pub use location::RelevantLocation;
pub use material::{Material, MaterialKind};
pub use name::UserName;
pub use norm::{Norm, NormOperator};
pub use planned_activity::{PlannedActivity, PlannedActivityStatus};
pub use relationship::{validate_relationships, RelationshipType, SocialNetworkRelationship};
pub use routine::Routine;
pub use social_practice::SocialPractice;

use crate::errors::{DomainError, DomainResult};
use crate::merge::{
    merge_list_checked, merge_list_field, validate_list, validate_list_checked, Identity,
    ValidationContext,
};
use crate::persistence::ProfileStore;
use crate::validation::{
    field_code, validate_nullable_email, validate_nullable_locale, validate_nullable_string,
    validate_nullable_telephone, validate_nullable_url,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gender of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Female
    #[serde(rename = "F")]
    Female,
    /// Male
    #[serde(rename = "M")]
    Male,
    /// Other
    #[serde(rename = "O")]
    Other,
    /// Non binary
    #[serde(rename = "non-binary")]
    NonBinary,
    /// Prefers not to say
    #[serde(rename = "not-say")]
    NotSay,
}

/// The profile of a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    /// Date of birth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<ProfileDate>,
    /// Gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number on the E.164 format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Locale such as `es_ES`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// URL of an image of the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Nationality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Languages the user understands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
    /// Occupation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    /// Individual norms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norms: Option<Vec<Norm>>,
    /// Planned activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_activities: Option<Vec<PlannedActivity>>,
    /// Locations of interest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_locations: Option<Vec<RelevantLocation>>,
    /// Relationships with other users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<SocialNetworkRelationship>>,
    /// Social practices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_practices: Option<Vec<SocialPractice>>,
    /// Routines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_behaviors: Option<Vec<Routine>>,
    /// Material resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<Material>>,
    /// Competences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competences: Option<Vec<Competence>>,
    /// Epoch seconds of the creation
    #[serde(default, rename = "_creationTs")]
    pub creation_ts: i64,
    /// Epoch seconds of the last update
    #[serde(default, rename = "_lastUpdateTs")]
    pub last_update_ts: i64,
}

impl UserProfile {
    /// Empty profile with the given id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Whether the profile holds the relationship `(user_id, relationship_type)`
    pub fn has_relationship(&self, user_id: &str, relationship_type: RelationshipType) -> bool {
        self.relationships
            .iter()
            .flatten()
            .any(|relationship| relationship.is(user_id, relationship_type))
    }

    /// Validate the whole profile, generating the missing ids
    pub async fn validate(
        self,
        prefix: &str,
        ctx: &ValidationContext,
        profiles: &dyn ProfileStore,
    ) -> DomainResult<Self> {
        self.validate_as(Identity::Keep, prefix, ctx, profiles).await
    }

    /// Validate a profile that is being created
    ///
    /// Neither the profile nor any of its entities may carry an id.
    pub async fn validate_new(
        self,
        prefix: &str,
        ctx: &ValidationContext,
        profiles: &dyn ProfileStore,
    ) -> DomainResult<Self> {
        self.validate_as(Identity::Fresh, prefix, ctx, profiles).await
    }

    /// Validate under the given identity rule
    ///
    /// Store lookups run in document order and stop at the first failure.
    pub async fn validate_as(
        self,
        identity: Identity,
        prefix: &str,
        ctx: &ValidationContext,
        profiles: &dyn ProfileStore,
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
                "You can not specify the identifier of the profile to create",
            ));
        }
        let mut profile = self.validate_scalars(prefix, ctx)?;
        profile.id = Some(supplied.unwrap_or_else(|| ctx.next_id()));

        let list = |field: &str| field_code(prefix, field);
        profile.norms = profile
            .norms
            .map(|items| validate_list(items, identity, &list("norms"), ctx))
            .transpose()?;
        if let Some(items) = profile.planned_activities.take() {
            profile.planned_activities = Some(
                validate_list_checked(items, identity, &list("plannedActivities"), ctx, profiles)
                    .await?,
            );
        }
        profile.relevant_locations = profile
            .relevant_locations
            .map(|items| validate_list(items, identity, &list("relevantLocations"), ctx))
            .transpose()?;
        if let Some(items) = profile.relationships.take() {
            profile.relationships =
                Some(validate_relationships(items, &list("relationships"), profiles).await?);
        }
        profile.social_practices = profile
            .social_practices
            .map(|items| validate_list(items, identity, &list("socialPractices"), ctx))
            .transpose()?;
        profile.personal_behaviors = profile
            .personal_behaviors
            .map(|items| validate_list(items, identity, &list("personalBehaviors"), ctx))
            .transpose()?;
        profile.materials = profile
            .materials
            .map(|items| validate_list(items, identity, &list("materials"), ctx))
            .transpose()?;
        profile.competences = profile
            .competences
            .map(|items| validate_list(items, identity, &list("competences"), ctx))
            .transpose()?;
        Ok(profile)
    }

    /// Check every field that is not a list of entities
    fn validate_scalars(mut self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.name = self
            .name
            .map(|name| name.validate(&field_code(prefix, "name")))
            .transpose()?;
        self.date_of_birth = self
            .date_of_birth
            .map(|date| {
                date.validate_birth_date(&field_code(prefix, "dateOfBirth"), ctx.clock.as_ref())
            })
            .transpose()?;
        self.email = validate_nullable_email(prefix, "email", self.email)?;
        self.locale = validate_nullable_locale(prefix, "locale", self.locale)?;
        self.phone_number = validate_nullable_telephone(
            prefix,
            "phoneNumber",
            self.locale.as_deref(),
            self.phone_number,
        )?;
        self.avatar = validate_nullable_url(prefix, "avatar", self.avatar)?;
        self.nationality = validate_nullable_string(prefix, "nationality", 255, self.nationality)?;
        self.languages = self
            .languages
            .map(|languages| validate_languages(languages, &field_code(prefix, "languages")))
            .transpose()?;
        self.occupation = validate_nullable_string(prefix, "occupation", 255, self.occupation)?;
        Ok(self)
    }

    /// Merge `source` over the profile
    ///
    /// Present scalar fields of `source` win. Languages and relationships are
    /// replaced when present. The entity lists are reconciled element by
    /// element. The id and timestamps always come from `self`, and `self` is
    /// never modified.
    pub async fn merge(
        &self,
        source: UserProfile,
        prefix: &str,
        ctx: &ValidationContext,
        profiles: &dyn ProfileStore,
    ) -> DomainResult<Self> {
        let name = match (&self.name, source.name) {
            (Some(current), source) => Some(current.merge(source, &field_code(prefix, "name"))?),
            (None, source) => source,
        };
        let date_of_birth = match (self.date_of_birth, source.date_of_birth) {
            (Some(current), Some(source)) => Some(current.merge_parts(source)),
            (current, source) => source.or(current),
        };
        let scalars = UserProfile {
            id: self.id.clone(),
            name,
            date_of_birth,
            gender: source.gender.or(self.gender),
            email: source.email.or_else(|| self.email.clone()),
            phone_number: source.phone_number.or_else(|| self.phone_number.clone()),
            locale: source.locale.or_else(|| self.locale.clone()),
            avatar: source.avatar.or_else(|| self.avatar.clone()),
            nationality: source.nationality.or_else(|| self.nationality.clone()),
            languages: source.languages.or_else(|| self.languages.clone()),
            occupation: source.occupation.or_else(|| self.occupation.clone()),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
            ..Default::default()
        };
        let mut merged = scalars.validate_scalars(prefix, ctx)?;

        let list = |field: &str| field_code(prefix, field);
        merged.norms = merge_list_field(&self.norms, source.norms, &list("norms"), ctx)?;
        merged.planned_activities = match source.planned_activities {
            None => self.planned_activities.clone(),
            Some(items) => Some(
                merge_list_checked(
                    self.planned_activities.as_deref().unwrap_or_default(),
                    Some(items),
                    &list("plannedActivities"),
                    ctx,
                    profiles,
                )
                .await?,
            ),
        };
        merged.relevant_locations = merge_list_field(
            &self.relevant_locations,
            source.relevant_locations,
            &list("relevantLocations"),
            ctx,
        )?;
        merged.relationships = match source.relationships {
            None => self.relationships.clone(),
            Some(items) => {
                Some(validate_relationships(items, &list("relationships"), profiles).await?)
            }
        };
        merged.social_practices = merge_list_field(
            &self.social_practices,
            source.social_practices,
            &list("socialPractices"),
            ctx,
        )?;
        merged.personal_behaviors = merge_list_field(
            &self.personal_behaviors,
            source.personal_behaviors,
            &list("personalBehaviors"),
            ctx,
        )?;
        merged.materials =
            merge_list_field(&self.materials, source.materials, &list("materials"), ctx)?;
        merged.competences =
            merge_list_field(&self.competences, source.competences, &list("competences"), ctx)?;

        debug!("Merged profile {:?}", merged.id);
        Ok(merged)
    }

    /// Replace every client field of the profile by the ones of `source`
    ///
    /// The id and timestamps of `self` are kept and the result is validated.
    pub async fn replace(
        &self,
        source: UserProfile,
        prefix: &str,
        ctx: &ValidationContext,
        profiles: &dyn ProfileStore,
    ) -> DomainResult<Self> {
        let replacement = UserProfile {
            id: self.id.clone(),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
            ..source
        };
        replacement.validate(prefix, ctx, profiles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::identifiers::SequentialIdGenerator;
    use crate::persistence::InMemoryProfileStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn context() -> ValidationContext {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        ValidationContext::new(
            Arc::new(SequentialIdGenerator::new("e")),
            Arc::new(FixedClock::on(today)),
        )
    }

    fn complete_profile() -> UserProfile {
        UserProfile {
            name: Some(UserName::new("Jane", "Doe")),
            date_of_birth: Some(ProfileDate::ymd(1990, 4, 23)),
            gender: Some(Gender::Female),
            email: Some("jane@internetofus.eu".into()),
            locale: Some("es_ES".into()),
            phone_number: Some("+34 987 65 43 21".into()),
            nationality: Some("Spanish".into()),
            languages: Some(vec![Language::new("es", LanguageLevel::C)]),
            occupation: Some("nurse".into()),
            norms: Some(vec![Norm::new("age", "18")]),
            relevant_locations: Some(vec![RelevantLocation::new("Home", 41.4, 2.1)]),
            personal_behaviors: Some(vec![Routine {
                label: Some("run".into()),
                from_time: Some("07:00".into()),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_validate_new_assigns_ids() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let profile = complete_profile()
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap();
        assert!(profile.id.is_some());
        assert_eq!(profile.phone_number.as_deref(), Some("+34987654321"));
        assert!(profile.norms.as_ref().unwrap()[0].id.is_some());

        let again = profile.clone().validate("profile", &ctx, &store).await.unwrap();
        assert_eq!(again, profile);
    }

    #[tokio::test]
    async fn test_validate_new_rejects_ids() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let error = UserProfile::with_id("1")
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap_err();
        assert_eq!(error.code(), Some("profile.id"));

        let mut with_norm_id = complete_profile();
        with_norm_id.norms.as_mut().unwrap()[0].id = Some("n".into());
        let error = with_norm_id
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap_err();
        assert_eq!(error.code(), Some("profile.norms[0].id"));
    }

    #[tokio::test]
    async fn test_scalar_errors_are_tagged() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let cases = [
            (
                UserProfile {
                    email: Some("bad email(at)host.com".into()),
                    ..Default::default()
                },
                "profile.email",
            ),
            (
                UserProfile {
                    locale: Some("de-Gr".into()),
                    ..Default::default()
                },
                "profile.locale",
            ),
            (
                UserProfile {
                    date_of_birth: Some(ProfileDate::ymd(2024, 6, 16)),
                    ..Default::default()
                },
                "profile.dateOfBirth",
            ),
            (
                UserProfile {
                    avatar: Some("not an url".into()),
                    ..Default::default()
                },
                "profile.avatar",
            ),
            (
                UserProfile {
                    languages: Some(vec![Language::new("eng", LanguageLevel::A)]),
                    ..Default::default()
                },
                "profile.languages[0].code",
            ),
        ];
        for (profile, code) in cases {
            let error = profile.validate("profile", &ctx, &store).await.unwrap_err();
            assert_eq!(error.code(), Some(code));
        }
    }

    #[tokio::test]
    async fn test_merge_keeps_absent_fields() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let current = complete_profile()
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap();
        let source = UserProfile {
            occupation: Some("doctor".into()),
            name: Some(UserName {
                middle: Some("M".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = current.merge(source, "profile", &ctx, &store).await.unwrap();
        assert_eq!(merged.occupation.as_deref(), Some("doctor"));
        assert_eq!(
            merged.name,
            Some(UserName {
                middle: Some("M".into()),
                ..UserName::new("Jane", "Doe")
            })
        );
        assert_eq!(merged.id, current.id);
        assert_eq!(merged.norms, current.norms);
        assert_eq!(merged.email, current.email);
        assert_eq!(merged.languages, current.languages);
    }

    #[tokio::test]
    async fn test_merge_with_itself_is_stable() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let current = complete_profile()
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap();
        let merged = current
            .merge(current.clone(), "profile", &ctx, &store)
            .await
            .unwrap();
        assert_eq!(merged, current);
    }

    #[tokio::test]
    async fn test_merge_unknown_location_id() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let current = complete_profile()
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap();
        let source = UserProfile {
            relevant_locations: Some(vec![RelevantLocation {
                id: Some("undefined".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let error = current.merge(source, "profile", &ctx, &store).await.unwrap_err();
        assert_eq!(error.code(), Some("profile.relevantLocations[0].id"));
    }

    #[tokio::test]
    async fn test_replace_keeps_identity() {
        let store = InMemoryProfileStore::new();
        let ctx = context();
        let mut current = complete_profile()
            .validate_new("profile", &ctx, &store)
            .await
            .unwrap();
        current.creation_ts = 10;
        current.last_update_ts = 20;
        let replaced = current
            .replace(
                UserProfile {
                    id: Some("other".into()),
                    occupation: Some("architect".into()),
                    ..Default::default()
                },
                "profile",
                &ctx,
                &store,
            )
            .await
            .unwrap();
        assert_eq!(replaced.id, current.id);
        assert_eq!((replaced.creation_ts, replaced.last_update_ts), (10, 20));
        assert_eq!(replaced.occupation.as_deref(), Some("architect"));
        assert_eq!(replaced.norms, None);
    }

    #[test]
    fn test_gender_names() {
        let genders: Vec<Gender> =
            serde_json::from_str(r#"["F","M","O","non-binary","not-say"]"#).unwrap();
        assert_eq!(genders.len(), 5);
        assert_eq!(genders[3], Gender::NonBinary);
    }

    #[test]
    fn test_json_names() {
        let profile = UserProfile {
            date_of_birth: Some(ProfileDate::ymd(1990, 1, 1)),
            creation_ts: 1,
            ..UserProfile::with_id("1")
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["dateOfBirth"]["year"], 1990);
        assert_eq!(json["_creationTs"], 1);
        assert_eq!(json["_lastUpdateTs"], 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_absent_fields_keep_current_values(
            occupation in "[a-z]{1,20}",
            nationality in proptest::option::of("[A-Z][a-z]{1,10}"),
        ) {
            let ctx = context();
            let store = InMemoryProfileStore::new();
            let current = tokio_test::block_on(
                UserProfile {
                    occupation: Some(occupation.clone()),
                    ..complete_profile()
                }
                .validate_new("profile", &ctx, &store),
            )
            .unwrap();
            let source = UserProfile {
                nationality: nationality.clone(),
                ..Default::default()
            };
            let merged = tokio_test::block_on(current.merge(source, "profile", &ctx, &store)).unwrap();
            proptest::prop_assert_eq!(merged.occupation, Some(occupation));
            proptest::prop_assert_eq!(merged.nationality, nationality.or(current.nationality.clone()));
            proptest::prop_assert_eq!(merged.norms, current.norms);
        }
    }
}
