// Copyright 2025 Cowboy AI, LLC.

//! Storage of profiles and their history

use crate::clock::{Clock, SystemClock};
use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{IdGenerator, UuidGenerator};
use crate::persistence::{Page, SortDirection};
use crate::profile::{HistoricProfile, UserProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Which archived versions of a profile to return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricProfileQuery {
    /// Profile whose history is searched
    pub profile_id: String,
    /// Only versions that started at or after this instant
    pub from: Option<i64>,
    /// Only versions that ended at or before this instant
    pub to: Option<i64>,
    /// Order by the start of the version
    pub order: SortDirection,
    /// Index of the first version to return
    pub offset: usize,
    /// Maximum number of versions to return
    pub limit: usize,
}

impl HistoricProfileQuery {
    /// Whole history of `profile_id`, oldest first, ten at a time
    pub fn of(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            from: None,
            to: None,
            order: SortDirection::Ascending,
            offset: 0,
            limit: 10,
        }
    }

    fn selects(&self, historic: &HistoricProfile) -> bool {
        historic.profile_id() == Some(self.profile_id.as_str())
            && self.from.is_none_or(|from| historic.from >= from)
            && self.to.is_none_or(|to| historic.to <= to)
    }
}

/// Persistence port of profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The stored profile with `id`, if any
    async fn find_profile_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>>;

    /// Store a new profile, setting both timestamps
    ///
    /// A profile without id is given one.
    async fn store_profile(&self, profile: UserProfile) -> DomainResult<UserProfile>;

    /// Overwrite a stored profile, setting the last update timestamp
    async fn update_profile(&self, profile: UserProfile) -> DomainResult<UserProfile>;

    /// Remove a stored profile
    async fn delete_profile(&self, id: &str) -> DomainResult<()>;

    /// Page through the stored profiles, oldest first
    async fn search_profiles(&self, offset: usize, limit: usize) -> DomainResult<Page<UserProfile>>;

    /// Archive a version of a profile
    async fn store_historic_profile(&self, historic: HistoricProfile)
        -> DomainResult<HistoricProfile>;

    /// Page through the archived versions of a profile
    async fn search_historic_profiles(
        &self,
        query: &HistoricProfileQuery,
    ) -> DomainResult<Page<HistoricProfile>>;
}

/// In-memory profile store for tests and embedding
#[derive(Debug, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    historic: Arc<RwLock<Vec<HistoricProfile>>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileStore {
    /// Store with random ids and the wall clock
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Store with the given id generator and clock
    pub fn with_capabilities(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            historic: Arc::new(RwLock::new(Vec::new())),
            ids,
            clock,
        }
    }

    /// Number of stored profiles
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Whether no profile is stored
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_profile_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(id).cloned())
    }

    async fn store_profile(&self, mut profile: UserProfile) -> DomainResult<UserProfile> {
        let id = profile.id.clone().unwrap_or_else(|| self.ids.next_id());
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&id) {
            return Err(DomainError::external(
                "ProfileStore",
                format!("a profile with id '{id}' is already stored"),
            ));
        }
        let now = self.clock.now_ts();
        profile.id = Some(id.clone());
        profile.creation_ts = now;
        profile.last_update_ts = now;
        profiles.insert(id.clone(), profile.clone());
        debug!("Stored profile {}", id);
        Ok(profile)
    }

    async fn update_profile(&self, mut profile: UserProfile) -> DomainResult<UserProfile> {
        let id = profile
            .id
            .clone()
            .ok_or_else(|| DomainError::external("ProfileStore", "can not update a profile without id"))?;
        let mut profiles = self.profiles.write().await;
        let Some(stored) = profiles.get_mut(&id) else {
            return Err(DomainError::not_found("profile", id));
        };
        profile.creation_ts = stored.creation_ts;
        profile.last_update_ts = self.clock.now_ts();
        *stored = profile.clone();
        debug!("Updated profile {}", id);
        Ok(profile)
    }

    async fn delete_profile(&self, id: &str) -> DomainResult<()> {
        let mut profiles = self.profiles.write().await;
        match profiles.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("profile", id)),
        }
    }

    async fn search_profiles(&self, offset: usize, limit: usize) -> DomainResult<Page<UserProfile>> {
        let profiles = self.profiles.read().await;
        let mut all: Vec<UserProfile> = profiles.values().cloned().collect();
        all.sort_by(|a, b| (a.creation_ts, &a.id).cmp(&(b.creation_ts, &b.id)));
        Ok(Page::from_all(all, offset, limit))
    }

    async fn store_historic_profile(
        &self,
        historic: HistoricProfile,
    ) -> DomainResult<HistoricProfile> {
        self.historic.write().await.push(historic.clone());
        Ok(historic)
    }

    async fn search_historic_profiles(
        &self,
        query: &HistoricProfileQuery,
    ) -> DomainResult<Page<HistoricProfile>> {
        let historic = self.historic.read().await;
        let mut selected: Vec<HistoricProfile> =
            historic.iter().filter(|h| query.selects(h)).cloned().collect();
        // stable, so versions archived in the same second keep their order
        selected.sort_by_key(|h| h.from);
        if query.order == SortDirection::Descending {
            selected.reverse();
        }
        Ok(Page::from_all(selected, query.offset, query.limit))
    }
}
