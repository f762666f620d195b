// Copyright 2025 Cowboy AI, LLC.

//! Storage of communities

use crate::clock::{Clock, SystemClock};
use crate::community::CommunityProfile;
use crate::errors::{DomainError, DomainResult};
use crate::identifiers::{IdGenerator, UuidGenerator};
use crate::persistence::Page;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Filters of a community search; every present field narrows the result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityQuery {
    /// Application of the community
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Text contained in the name, case insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Keyword the community must have
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// User that must be a member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl CommunityQuery {
    /// Whether `community` is selected
    pub fn matches(&self, community: &CommunityProfile) -> bool {
        let app = self
            .app_id
            .as_deref()
            .is_none_or(|app_id| community.app_id.as_deref() == Some(app_id));
        let name = self.name.as_deref().is_none_or(|needle| {
            community
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
        });
        let keyword = self.keyword.as_deref().is_none_or(|keyword| {
            community
                .keywords
                .iter()
                .flatten()
                .any(|candidate| candidate == keyword)
        });
        let member = self
            .member
            .as_deref()
            .is_none_or(|user_id| community.has_member(user_id));
        app && name && keyword && member
    }
}

/// Persistence port of communities
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// The stored community with `id`, if any
    async fn find_community_by_id(&self, id: &str) -> DomainResult<Option<CommunityProfile>>;

    /// Store a new community, setting both timestamps
    async fn store_community(&self, community: CommunityProfile)
        -> DomainResult<CommunityProfile>;

    /// Overwrite a stored community, setting the last update timestamp
    async fn update_community(
        &self,
        community: CommunityProfile,
    ) -> DomainResult<CommunityProfile>;

    /// Remove a stored community
    async fn delete_community(&self, id: &str) -> DomainResult<()>;

    /// Page through the communities selected by `query`, oldest first
    async fn search_communities(
        &self,
        query: &CommunityQuery,
        offset: usize,
        limit: usize,
    ) -> DomainResult<Page<CommunityProfile>>;
}

/// In-memory community store for tests and embedding
#[derive(Debug, Clone)]
pub struct InMemoryCommunityStore {
    communities: Arc<RwLock<HashMap<String, CommunityProfile>>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryCommunityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCommunityStore {
    /// Store with random ids and the wall clock
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Store with the given id generator and clock
    pub fn with_capabilities(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            communities: Arc::new(RwLock::new(HashMap::new())),
            ids,
            clock,
        }
    }
}

#[async_trait]
impl CommunityStore for InMemoryCommunityStore {
    async fn find_community_by_id(&self, id: &str) -> DomainResult<Option<CommunityProfile>> {
        Ok(self.communities.read().await.get(id).cloned())
    }

    async fn store_community(
        &self,
        mut community: CommunityProfile,
    ) -> DomainResult<CommunityProfile> {
        let id = community.id.clone().unwrap_or_else(|| self.ids.next_id());
        let mut communities = self.communities.write().await;
        if communities.contains_key(&id) {
            return Err(DomainError::external(
                "CommunityStore",
                format!("a community with id '{id}' is already stored"),
            ));
        }
        let now = self.clock.now_ts();
        community.id = Some(id.clone());
        community.creation_ts = now;
        community.last_update_ts = now;
        communities.insert(id.clone(), community.clone());
        debug!("Stored community {}", id);
        Ok(community)
    }

    async fn update_community(
        &self,
        mut community: CommunityProfile,
    ) -> DomainResult<CommunityProfile> {
        let id = community.id.clone().ok_or_else(|| {
            DomainError::external("CommunityStore", "can not update a community without id")
        })?;
        let mut communities = self.communities.write().await;
        let Some(stored) = communities.get_mut(&id) else {
            return Err(DomainError::not_found("community", id));
        };
        community.creation_ts = stored.creation_ts;
        community.last_update_ts = self.clock.now_ts();
        *stored = community.clone();
        Ok(community)
    }

    async fn delete_community(&self, id: &str) -> DomainResult<()> {
        match self.communities.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("community", id)),
        }
    }

    async fn search_communities(
        &self,
        query: &CommunityQuery,
        offset: usize,
        limit: usize,
    ) -> DomainResult<Page<CommunityProfile>> {
        let communities = self.communities.read().await;
        let mut selected: Vec<CommunityProfile> = communities
            .values()
            .filter(|community| query.matches(community))
            .cloned()
            .collect();
        selected.sort_by(|a, b| (a.creation_ts, &a.id).cmp(&(b.creation_ts, &b.id)));
        Ok(Page::from_all(selected, offset, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::CommunityMember;

    async fn store() -> InMemoryCommunityStore {
        let store = InMemoryCommunityStore::new();
        let communities = [
            CommunityProfile {
                keywords: Some(vec!["cars".into()]),
                members: Some(vec![CommunityMember::new("1")]),
                ..CommunityProfile::new("app1", "Car poolers")
            },
            CommunityProfile::new("app1", "Walkers"),
            CommunityProfile {
                members: Some(vec![CommunityMember::new("1")]),
                ..CommunityProfile::new("app2", "Night walkers")
            },
        ];
        for community in communities {
            store.store_community(community).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_search_filters() {
        let store = store().await;
        let total = |query: CommunityQuery| {
            let store = store.clone();
            async move { store.search_communities(&query, 0, 10).await.unwrap().total }
        };
        assert_eq!(total(CommunityQuery::default()).await, 3);
        assert_eq!(
            total(CommunityQuery {
                app_id: Some("app1".into()),
                ..Default::default()
            })
            .await,
            2
        );
        assert_eq!(
            total(CommunityQuery {
                name: Some("WALK".into()),
                ..Default::default()
            })
            .await,
            2
        );
        assert_eq!(
            total(CommunityQuery {
                keyword: Some("cars".into()),
                ..Default::default()
            })
            .await,
            1
        );
        assert_eq!(
            total(CommunityQuery {
                member: Some("1".into()),
                app_id: Some("app2".into()),
                ..Default::default()
            })
            .await,
            1
        );
    }

    #[tokio::test]
    async fn test_update_missing_community() {
        let store = store().await;
        let error = store
            .update_community(CommunityProfile {
                id: Some("undefined".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(error.is_not_found());
    }
}
