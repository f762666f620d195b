// Copyright 2025 Cowboy AI, LLC.

//! Validation and merge contract of identity-bearing entities
//!
//! Every nested entity of a profile or community (norms, locations,
//! activities, ...) carries a server owned identifier. This module defines
//! how such entities are validated, how one version is merged over another,
//! and how a list of them sent by a client is reconciled with the list
//! already stored.
//!
//! # List reconciliation
//!
//! Given the stored list and the list sent by the client:
//!
//! 1. no list sent: the stored list is kept untouched
//! 2. an element without id is new and gets a fresh id
//! 3. an element whose id matches a stored element is merged over it
//! 4. an element with an unknown id, or an id already used by an earlier
//!    element, fails at `<prefix>[i].id`
//!
//! The result follows the order of the list sent. The first failure aborts
//! the whole reconciliation.

use crate::clock::{Clock, SystemClock};
use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{IdGenerator, UuidGenerator};
use crate::persistence::ProfileStore;
use crate::validation::{element_code, field_code};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

/// Message of a list element whose id is unknown or repeated
pub const UNKNOWN_ENTITY_MESSAGE: &str =
    "does not exist an entity with the specified identifier or it is duplicated";

/// Capabilities available while validating
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Source of identifiers for new entities
    pub ids: Arc<dyn IdGenerator>,
    /// Source of the current date and time
    pub clock: Arc<dyn Clock>,
}

impl ValidationContext {
    /// Create a context from explicit capabilities
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Random ids and the wall clock
    pub fn system() -> Self {
        Self::new(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Fresh identifier
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::system()
    }
}

/// Whether a client may send identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Supplied ids are kept, missing ones are generated
    Keep,
    /// The entity is being created, a supplied id is an error
    Fresh,
}

/// Contract of every entity with a server assigned identifier
pub trait MergeableEntity: Clone + Send + Sync + Sized {
    /// Human readable name used in error messages
    const ENTITY_NAME: &'static str;

    /// Current identifier
    fn id(&self) -> Option<&str>;

    /// Replace the identifier
    fn set_id(&mut self, id: Option<String>);

    /// Check and normalise every field except the id
    fn validate_fields(self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self>;

    /// Overlay the present fields of `source` on `self`
    ///
    /// The result is not validated yet and its id is replaced by `self`'s.
    fn merge_fields(
        &self,
        source: Self,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self>;

    /// Validate the entity, generating an id when it has none
    ///
    /// Validating an already valid entity returns it unchanged.
    fn validate(self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.validate_as(Identity::Keep, prefix, ctx)
    }

    /// Validate an entity that is being created
    fn validate_new(self, prefix: &str, ctx: &ValidationContext) -> DomainResult<Self> {
        self.validate_as(Identity::Fresh, prefix, ctx)
    }

    /// Validate under the given identity rule
    fn validate_as(
        self,
        identity: Identity,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        let supplied = self
            .id()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        if supplied.is_some() && identity == Identity::Fresh {
            return Err(DomainError::validation(
                field_code(prefix, "id"),
                format!(
                    "You can not specify the identifier of the {} to create",
                    Self::ENTITY_NAME
                ),
            ));
        }
        let mut validated = self.validate_fields(prefix, ctx)?;
        validated.set_id(Some(supplied.unwrap_or_else(|| ctx.next_id())));
        Ok(validated)
    }

    /// Merge `source` over `self` and validate the result
    ///
    /// `None` returns a copy of `self`. The id is always `self`'s.
    fn merge(
        &self,
        source: Option<Self>,
        prefix: &str,
        ctx: &ValidationContext,
    ) -> DomainResult<Self> {
        let Some(source) = source else {
            return Ok(self.clone());
        };
        let mut merged = self.merge_fields(source, prefix, ctx)?;
        merged.set_id(self.id().map(str::to_string));
        merged.validate(prefix, ctx)
    }
}

/// Merge an optional single entity
///
/// With nothing stored the source is validated as it comes.
pub fn merge_optional<T: MergeableEntity>(
    current: Option<&T>,
    source: Option<T>,
    prefix: &str,
    ctx: &ValidationContext,
) -> DomainResult<Option<T>> {
    match (current, source) {
        (Some(current), source) => current.merge(source, prefix, ctx).map(Some),
        (None, Some(source)) => source.validate(prefix, ctx).map(Some),
        (None, None) => Ok(None),
    }
}

/// Entity whose validity depends on other profiles existing
#[async_trait]
pub trait ReferenceChecked: MergeableEntity {
    /// Check every profile referenced by the entity at `code` exists
    async fn verify_references(&self, code: &str, profiles: &dyn ProfileStore)
        -> DomainResult<()>;
}

/// Fail at `code` unless the profile `id` is stored
pub async fn require_profile(
    profiles: &dyn ProfileStore,
    id: &str,
    code: impl Into<String>,
) -> DomainResult<()> {
    match profiles.find_profile_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::validation(
            code,
            format!("does not exist a profile with id '{id}'"),
        )),
    }
}

/// Validate every element of a list under `<prefix>[i]`
pub fn validate_list<T: MergeableEntity>(
    items: Vec<T>,
    identity: Identity,
    prefix: &str,
    ctx: &ValidationContext,
) -> DomainResult<Vec<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.validate_as(identity, &element_code(prefix, index), ctx))
        .collect()
}

/// Validate every element and then check its references, in order
pub async fn validate_list_checked<T: ReferenceChecked>(
    items: Vec<T>,
    identity: Identity,
    prefix: &str,
    ctx: &ValidationContext,
    profiles: &dyn ProfileStore,
) -> DomainResult<Vec<T>> {
    let mut validated = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let code = element_code(prefix, index);
        let item = item.validate_as(identity, &code, ctx)?;
        item.verify_references(&code, profiles).await?;
        validated.push(item);
    }
    Ok(validated)
}

struct Reconciler<'a, T> {
    available: HashMap<&'a str, &'a T>,
}

impl<'a, T: MergeableEntity> Reconciler<'a, T> {
    fn new(current: &'a [T]) -> Self {
        let available = current
            .iter()
            .filter_map(|item| item.id().map(|id| (id, item)))
            .collect();
        Self { available }
    }

    fn reconcile(&mut self, element: T, code: &str, ctx: &ValidationContext) -> DomainResult<T> {
        let Some(id) = element.id().map(str::to_string) else {
            return element.validate(code, ctx);
        };
        match self.available.remove(id.as_str()) {
            Some(prior) => prior.merge(Some(element), code, ctx),
            None => Err(DomainError::validation(
                field_code(code, "id"),
                UNKNOWN_ENTITY_MESSAGE,
            )),
        }
    }
}

/// Reconcile the stored list with the one sent by the client
///
/// # Examples
///
/// ```rust
/// use profile_manager::merge::{merge_list, MergeableEntity, ValidationContext};
/// use profile_manager::profile::Norm;
///
/// let ctx = ValidationContext::system();
/// let current = vec![Norm::new("age", "18").validate("norms[0]", &ctx).unwrap()];
///
/// // Nothing sent keeps the stored list
/// assert_eq!(merge_list(&current, None, "norms", &ctx).unwrap(), current);
///
/// // An unknown id is rejected
/// let mut stranger = Norm::new("age", "21");
/// stranger.id = Some("unknown".into());
/// let error = merge_list(&current, Some(vec![stranger]), "norms", &ctx).unwrap_err();
/// assert_eq!(error.code(), Some("norms[0].id"));
/// ```
pub fn merge_list<T: MergeableEntity>(
    current: &[T],
    source: Option<Vec<T>>,
    prefix: &str,
    ctx: &ValidationContext,
) -> DomainResult<Vec<T>> {
    let Some(source) = source else {
        return Ok(current.to_vec());
    };
    let mut reconciler = Reconciler::new(current);
    source
        .into_iter()
        .enumerate()
        .map(|(index, element)| reconciler.reconcile(element, &element_code(prefix, index), ctx))
        .collect()
}

/// [`merge_list`] over list fields that may be unset
///
/// An unset source keeps the stored field as it is, unset or not.
pub fn merge_list_field<T: MergeableEntity>(
    current: &Option<Vec<T>>,
    source: Option<Vec<T>>,
    prefix: &str,
    ctx: &ValidationContext,
) -> DomainResult<Option<Vec<T>>> {
    match source {
        None => Ok(current.clone()),
        Some(source) => {
            merge_list(current.as_deref().unwrap_or_default(), Some(source), prefix, ctx).map(Some)
        }
    }
}

/// Like [`merge_list`] but each reconciled element has its references checked
///
/// Elements are processed one after the other and the store is queried in
/// list order.
pub async fn merge_list_checked<T: ReferenceChecked>(
    current: &[T],
    source: Option<Vec<T>>,
    prefix: &str,
    ctx: &ValidationContext,
    profiles: &dyn ProfileStore,
) -> DomainResult<Vec<T>> {
    let Some(source) = source else {
        return Ok(current.to_vec());
    };
    let mut reconciler = Reconciler::new(current);
    let mut merged = Vec::with_capacity(source.len());
    for (index, element) in source.into_iter().enumerate() {
        let code = element_code(prefix, index);
        let element = reconciler.reconcile(element, &code, ctx)?;
        element.verify_references(&code, profiles).await?;
        merged.push(element);
    }
    Ok(merged)
}

/// Fail at the first element whose key was already seen
///
/// The error is reported at `<prefix>[i]` or `<prefix>[i].<field>` of the
/// later element.
pub fn ensure_unique<T, K, F>(
    items: &[T],
    prefix: &str,
    field: Option<&str>,
    message: &str,
    key: F,
) -> DomainResult<()>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !seen.insert(key(item)) {
            let code = element_code(prefix, index);
            let code = match field {
                Some(field) => field_code(&code, field),
                None => code,
            };
            return Err(DomainError::validation(code, message));
        }
    }
    Ok(())
}
