// Copyright 2025 Cowboy AI, LLC.

//! Selection of the trust events a score is calculated from

use crate::errors::{DomainError, DomainResult};
use crate::trust::TrustEvent;
use crate::validation::field_code;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compares one field of an event
///
/// A value written between slashes, such as `/^task-[12]$/`, is a regular
/// expression. Any other value must be equal to the field.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The field must be equal
    Exact(String),
    /// The field must match
    Pattern(Regex),
}

impl Matcher {
    /// Parse the matcher for `<prefix>.<field>`
    pub fn parse(prefix: &str, field: &str, value: &str) -> DomainResult<Self> {
        let value = value.trim();
        match value
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) if value.len() > 1 => Regex::new(pattern).map(Matcher::Pattern).map_err(|e| {
                DomainError::validation(
                    field_code(prefix, field),
                    format!("The '{value}' is not a valid regular expression: {e}"),
                )
            }),
            _ => Ok(Matcher::Exact(value.to_string())),
        }
    }

    /// Whether the field value is selected
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Matcher::Exact(expected), Some(value)) => expected == value,
            (Matcher::Pattern(pattern), Some(value)) => pattern.is_match(value),
            (_, None) => false,
        }
    }
}

/// Which events take part in a trust calculation
///
/// Every present field narrows the selection. The report time bounds are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustQuery {
    /// Matcher of the user that reported the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Matcher of the user the event is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Matcher of the application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Matcher of the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    /// Matcher of the task type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type_id: Option<String>,
    /// Matcher of the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Matcher of the relationship type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    /// Earliest report time, epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_from: Option<i64>,
    /// Latest report time, epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_to: Option<i64>,
}

impl TrustQuery {
    /// Events reported by `source_id` about `target_id`
    pub fn between(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            target_id: Some(target_id.into()),
            ..Default::default()
        }
    }

    /// Matcher equal to `value` only, even when it is written between slashes
    pub fn literal(value: &str) -> String {
        format!("/^{}$/", regex::escape(value.trim()))
    }

    /// Replace the source and target matchers by the literal ids
    pub fn for_users(mut self, source_id: &str, target_id: &str) -> Self {
        self.source_id = Some(Self::literal(source_id));
        self.target_id = Some(Self::literal(target_id));
        self
    }

    /// Narrow to an application
    pub fn with_app(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Narrow to a community
    pub fn with_community(mut self, community_id: impl Into<String>) -> Self {
        self.community_id = Some(community_id.into());
        self
    }

    /// Narrow to a task type
    pub fn with_task_type(mut self, task_type_id: impl Into<String>) -> Self {
        self.task_type_id = Some(task_type_id.into());
        self
    }

    /// Narrow to a task
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Narrow to a relationship type
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    /// Narrow to events reported in `[from, to]`
    pub fn reported_between(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.report_from = from;
        self.report_to = to;
        self
    }

    /// Parse the matchers
    pub fn compile(&self) -> DomainResult<TrustFilter> {
        let parse = |field: &str, value: &Option<String>| {
            value
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(|value| Matcher::parse("query", field, value))
                .transpose()
        };
        if let (Some(from), Some(to)) = (self.report_from, self.report_to) {
            if from > to {
                return Err(DomainError::validation(
                    "query.reportTo",
                    "The report range ends before it starts.",
                ));
            }
        }
        Ok(TrustFilter {
            source_id: parse("sourceId", &self.source_id)?,
            target_id: parse("targetId", &self.target_id)?,
            app_id: parse("appId", &self.app_id)?,
            community_id: parse("communityId", &self.community_id)?,
            task_type_id: parse("taskTypeId", &self.task_type_id)?,
            task_id: parse("taskId", &self.task_id)?,
            relationship: parse("relationship", &self.relationship)?,
            report_from: self.report_from,
            report_to: self.report_to,
        })
    }
}

/// A compiled [`TrustQuery`]
#[derive(Debug, Clone, Default)]
pub struct TrustFilter {
    source_id: Option<Matcher>,
    target_id: Option<Matcher>,
    app_id: Option<Matcher>,
    community_id: Option<Matcher>,
    task_type_id: Option<Matcher>,
    task_id: Option<Matcher>,
    relationship: Option<Matcher>,
    report_from: Option<i64>,
    report_to: Option<i64>,
}

impl TrustFilter {
    /// Whether `event` is selected
    pub fn matches(&self, event: &TrustEvent) -> bool {
        let field = |matcher: &Option<Matcher>, value: Option<&str>| {
            matcher.as_ref().is_none_or(|matcher| matcher.matches(value))
        };
        let relationship = event.relationship.map(|relationship| relationship.to_string());
        field(&self.source_id, event.source_id.as_deref())
            && field(&self.target_id, event.target_id.as_deref())
            && field(&self.app_id, event.app_id.as_deref())
            && field(&self.community_id, event.community_id.as_deref())
            && field(&self.task_type_id, event.task_type_id.as_deref())
            && field(&self.task_id, event.task_id.as_deref())
            && field(&self.relationship, relationship.as_deref())
            && self.report_from.is_none_or(|from| event.report_time >= from)
            && self.report_to.is_none_or(|to| event.report_time <= to)
    }
}
