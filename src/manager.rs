// Copyright 2025 Cowboy AI, LLC.

//! Lifecycle of profiles, communities and trust events
//!
//! [`ProfileManager`] loads the current documents from the stores, builds the
//! new values with the merge engine and writes them back. Every profile
//! update and delete archives the previous state as a [`HistoricProfile`].

use crate::community::CommunityProfile;
use crate::config::ProfileManagerConfig;
use crate::errors::{DomainError, DomainResult};
use crate::merge::ValidationContext;
use crate::persistence::{
    CommunityQuery, CommunityStore, EventStore, HistoricProfileQuery, InMemoryCommunityStore,
    InMemoryEventStore, InMemoryProfileStore, Page, ProfileStore, SortDirection,
};
use crate::profile::{HistoricProfile, UserProfile};
use crate::trust::{Trust, TrustAggregationEngine, TrustAggregator, TrustEvent, TrustQuery};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const PROFILE: &str = "profile";
const COMMUNITY: &str = "community";
const EVENT: &str = "event";

fn log_failure(operation: &str, error: &DomainError) {
    if error.is_collaborator_error() {
        warn!("Failed to {}: {}", operation, error);
    } else {
        debug!("Rejected {}: {}", operation, error);
    }
}

/// Service object of the profile manager
#[derive(Clone)]
pub struct ProfileManager {
    profiles: Arc<dyn ProfileStore>,
    communities: Arc<dyn CommunityStore>,
    events: Arc<dyn EventStore>,
    trust: TrustAggregationEngine,
    ctx: ValidationContext,
    config: ProfileManagerConfig,
}

impl fmt::Debug for ProfileManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileManager")
            .field("ctx", &self.ctx)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProfileManager {
    /// Manager over the given stores
    ///
    /// Fails with [`DomainError::ConfigurationError`] when `config` is invalid.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        communities: Arc<dyn CommunityStore>,
        events: Arc<dyn EventStore>,
        ctx: ValidationContext,
        config: ProfileManagerConfig,
    ) -> DomainResult<Self> {
        config.validate()?;
        let trust = TrustAggregationEngine::new(events.clone(), config.trust.recency_window);
        Ok(Self {
            profiles,
            communities,
            events,
            trust,
            ctx,
            config,
        })
    }

    /// Manager over fresh in-memory stores sharing the capabilities of `ctx`
    pub fn in_memory(ctx: ValidationContext, config: ProfileManagerConfig) -> DomainResult<Self> {
        Self::new(
            Arc::new(InMemoryProfileStore::with_capabilities(
                ctx.ids.clone(),
                ctx.clock.clone(),
            )),
            Arc::new(InMemoryCommunityStore::with_capabilities(
                ctx.ids.clone(),
                ctx.clock.clone(),
            )),
            Arc::new(InMemoryEventStore::with_clock(ctx.clock.clone())),
            ctx,
            config,
        )
    }

    /// Active configuration
    pub fn config(&self) -> &ProfileManagerConfig {
        &self.config
    }

    /// Capabilities used while validating
    pub fn context(&self) -> &ValidationContext {
        &self.ctx
    }

    /// Validate and store a new profile
    pub async fn create_profile(&self, profile: UserProfile) -> DomainResult<UserProfile> {
        let created = async {
            let profile = profile
                .validate_new(PROFILE, &self.ctx, self.profiles.as_ref())
                .await?;
            self.profiles.store_profile(profile).await
        }
        .await
        .inspect_err(|error| log_failure("create profile", error))?;
        info!("Created profile {:?}", created.id);
        Ok(created)
    }

    /// The stored profile with `id`
    pub async fn retrieve_profile(&self, id: &str) -> DomainResult<UserProfile> {
        self.profiles
            .find_profile_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROFILE, id))
    }

    /// Replace every client field of the profile `id`
    pub async fn replace_profile(&self, id: &str, source: UserProfile) -> DomainResult<UserProfile> {
        let profiles = self.profiles.as_ref();
        let result = async {
            let current = self.retrieve_profile(id).await?;
            let replaced = current.replace(source, PROFILE, &self.ctx, profiles).await?;
            self.update_with_history(current, replaced).await
        }
        .await
        .inspect_err(|error| log_failure("replace profile", error))?;
        info!("Replaced profile {}", id);
        Ok(result)
    }

    /// Merge `source` over the profile `id`
    pub async fn merge_profile(&self, id: &str, source: UserProfile) -> DomainResult<UserProfile> {
        let profiles = self.profiles.as_ref();
        let result = async {
            let current = self.retrieve_profile(id).await?;
            let merged = current.merge(source, PROFILE, &self.ctx, profiles).await?;
            self.update_with_history(current, merged).await
        }
        .await
        .inspect_err(|error| log_failure("merge profile", error))?;
        info!("Merged profile {}", id);
        Ok(result)
    }

    async fn update_with_history(
        &self,
        previous: UserProfile,
        updated: UserProfile,
    ) -> DomainResult<UserProfile> {
        let updated = self.profiles.update_profile(updated).await?;
        let archived = HistoricProfile::archive(previous, updated.last_update_ts);
        // the update is already committed, a lost snapshot must not undo it
        if let Err(error) = self.profiles.store_historic_profile(archived).await {
            warn!(
                "Failed to archive the previous state of profile {:?}: {}",
                updated.id, error
            );
        }
        Ok(updated)
    }

    /// Archive the final state of the profile `id` and delete it
    pub async fn delete_profile(&self, id: &str) -> DomainResult<UserProfile> {
        let deleted = async {
            let current = self.retrieve_profile(id).await?;
            let archived = HistoricProfile::archive(current.clone(), self.ctx.clock.now_ts());
            self.profiles.store_historic_profile(archived).await?;
            self.profiles.delete_profile(id).await?;
            Ok::<_, DomainError>(current)
        }
        .await
        .inspect_err(|error| log_failure("delete profile", error))?;
        info!("Deleted profile {}", id);
        Ok(deleted)
    }

    /// Page through the stored profiles
    pub async fn search_profiles(
        &self,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> DomainResult<Page<UserProfile>> {
        let (offset, limit) = self.config.paging.clamp(offset, limit);
        self.profiles.search_profiles(offset, limit).await
    }

    /// Page through the archived versions of the profile `profile_id`
    ///
    /// Only versions that started at or after `from` and ended at or before
    /// `to` are returned.
    pub async fn search_historic_profiles(
        &self,
        profile_id: &str,
        from: Option<i64>,
        to: Option<i64>,
        order: SortDirection,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> DomainResult<Page<HistoricProfile>> {
        let (offset, limit) = self.config.paging.clamp(offset, limit);
        let query = HistoricProfileQuery {
            profile_id: profile_id.to_string(),
            from,
            to,
            order,
            offset,
            limit,
        };
        self.profiles.search_historic_profiles(&query).await
    }

    /// Validate and store a new community
    pub async fn create_community(
        &self,
        community: CommunityProfile,
    ) -> DomainResult<CommunityProfile> {
        let created = async {
            let community = community.validate_new(COMMUNITY, &self.ctx)?;
            self.communities.store_community(community).await
        }
        .await
        .inspect_err(|error| log_failure("create community", error))?;
        info!("Created community {:?}", created.id);
        Ok(created)
    }

    /// The stored community with `id`
    pub async fn retrieve_community(&self, id: &str) -> DomainResult<CommunityProfile> {
        self.communities
            .find_community_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(COMMUNITY, id))
    }

    /// Replace every client field of the community `id`
    pub async fn replace_community(
        &self,
        id: &str,
        source: CommunityProfile,
    ) -> DomainResult<CommunityProfile> {
        let result = async {
            let current = self.retrieve_community(id).await?;
            let replaced = current.replace(source, COMMUNITY, &self.ctx)?;
            self.communities.update_community(replaced).await
        }
        .await
        .inspect_err(|error| log_failure("replace community", error))?;
        info!("Replaced community {}", id);
        Ok(result)
    }

    /// Merge `source` over the community `id`
    pub async fn merge_community(
        &self,
        id: &str,
        source: CommunityProfile,
    ) -> DomainResult<CommunityProfile> {
        let result = async {
            let current = self.retrieve_community(id).await?;
            let merged = current.merge(source, COMMUNITY, &self.ctx)?;
            self.communities.update_community(merged).await
        }
        .await
        .inspect_err(|error| log_failure("merge community", error))?;
        info!("Merged community {}", id);
        Ok(result)
    }

    /// Delete the community `id`
    pub async fn delete_community(&self, id: &str) -> DomainResult<CommunityProfile> {
        let current = self.retrieve_community(id).await?;
        self.communities
            .delete_community(id)
            .await
            .inspect_err(|error| log_failure("delete community", error))?;
        info!("Deleted community {}", id);
        Ok(current)
    }

    /// Page through the communities selected by `query`
    pub async fn search_communities(
        &self,
        query: &CommunityQuery,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> DomainResult<Page<CommunityProfile>> {
        let (offset, limit) = self.config.paging.clamp(offset, limit);
        self.communities.search_communities(query, offset, limit).await
    }

    /// Validate and store a trust event
    pub async fn add_trust_event(&self, event: TrustEvent) -> DomainResult<TrustEvent> {
        let stored = async {
            let event = event.validate(EVENT, self.profiles.as_ref()).await?;
            self.events.append_event(event).await
        }
        .await
        .inspect_err(|error| log_failure("add trust event", error))?;
        debug!(
            "Added trust event from {:?} to {:?}",
            stored.source_id, stored.target_id
        );
        Ok(stored)
    }

    /// Trust of `source_id` on `target_id` over the events selected by `query`
    ///
    /// The source and target of `query` are overridden by the two ids, which
    /// are always compared literally. Without `aggregator` the configured
    /// default is used.
    pub async fn calculate_trust(
        &self,
        source_id: &str,
        target_id: &str,
        query: TrustQuery,
        aggregator: Option<TrustAggregator>,
    ) -> DomainResult<Trust> {
        let aggregator = aggregator.unwrap_or(self.config.trust.default_aggregator);
        let query = query.for_users(source_id, target_id);
        let value = self
            .trust
            .calculate_trust_by(aggregator, &query)
            .await
            .inspect_err(|error| log_failure("calculate trust", error))?;
        Ok(Trust {
            value,
            calculated_time: self.ctx.clock.now_ts(),
        })
    }
}
