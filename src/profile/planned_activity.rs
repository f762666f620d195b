// Copyright 2025 Cowboy AI, LLC.

//! Activities a user has planned with other users

use crate::errors::DomainResult;
use crate::merge::{require_profile, MergeableEntity, ReferenceChecked, ValidationContext};
use crate::persistence::ProfileStore;
use crate::validation::{
    element_code, field_code, validate_nullable_instant, validate_nullable_string,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Whether an activity will happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannedActivityStatus {
    /// It will happen
    Confirmed,
    /// It may happen
    Tentative,
    /// It will not happen
    Cancelled,
}

/// An activity on the agenda of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedActivity {
    /// Server assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Starting instant, ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Ending instant, ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// What the activity is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Profile ids of the users taking part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlannedActivityStatus>,
}

impl PlannedActivity {
    /// Activity described by `description` with the given attendees
    pub fn new<I, S>(description: impl Into<String>, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: Some(description.into()),
            attendees: Some(attendees.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }
}

impl MergeableEntity for PlannedActivity {
    const ENTITY_NAME: &'static str = "planned activity";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate_fields(mut self, prefix: &str, _ctx: &ValidationContext) -> DomainResult<Self> {
        self.start_time = validate_nullable_instant(prefix, "startTime", self.start_time)?;
        self.end_time = validate_nullable_instant(prefix, "endTime", self.end_time)?;
        self.description = validate_nullable_string(prefix, "description", 255, self.description)?;
        if let Some(attendees) = self.attendees.take() {
            let mut validated = Vec::with_capacity(attendees.len());
            for (index, attendee) in attendees.into_iter().enumerate() {
                let field = element_code("attendees", index);
                if let Some(attendee) = validate_nullable_string(prefix, &field, 255, Some(attendee))? {
                    validated.push(attendee);
                }
            }
            self.attendees = Some(validated);
        }
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
            start_time: source.start_time.or_else(|| self.start_time.clone()),
            end_time: source.end_time.or_else(|| self.end_time.clone()),
            description: source.description.or_else(|| self.description.clone()),
            attendees: source.attendees.or_else(|| self.attendees.clone()),
            status: source.status.or(self.status),
        })
    }
}

#[async_trait]
impl ReferenceChecked for PlannedActivity {
    async fn verify_references(
        &self,
        code: &str,
        profiles: &dyn ProfileStore,
    ) -> DomainResult<()> {
        for (index, attendee) in self.attendees.iter().flatten().enumerate() {
            let attendee_code = field_code(code, &element_code("attendees", index));
            require_profile(profiles, attendee, attendee_code).await?;
        }
        Ok(())
    }
}
