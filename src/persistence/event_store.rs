// Copyright 2025 Cowboy AI, LLC.

//! Append-only storage of trust events

use crate::clock::{Clock, SystemClock};
use crate::errors::DomainResult;
use crate::trust::{TrustEvent, TrustQuery};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistence port of trust events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append an event, setting its report time
    async fn append_event(&self, event: TrustEvent) -> DomainResult<TrustEvent>;

    /// Every stored event selected by `query`
    async fn query_events(&self, query: &TrustQuery) -> DomainResult<Vec<TrustEvent>>;
}

/// In-memory event store for tests and embedding
#[derive(Debug, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<TrustEvent>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    /// Store stamping events with the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store stamping events with `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Store already holding `events`, report times included
    pub fn with_events(events: Vec<TrustEvent>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
            clock: Arc::new(SystemClock),
        }
    }

    /// Number of stored events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Whether no event is stored
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_event(&self, mut event: TrustEvent) -> DomainResult<TrustEvent> {
        event.report_time = self.clock.now_ts();
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn query_events(&self, query: &TrustQuery) -> DomainResult<Vec<TrustEvent>> {
        let filter = query.compile()?;
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }
}
