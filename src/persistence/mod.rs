// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! Storage ports of the profile manager and their in-memory implementations.
//!
//! ## Components
//!
//! - **Profile store**: profiles and their archived versions
//! - **Community store**: communities and their search
//! - **Event store**: append-only trust events
//! - **Query support**: paging of search results

mod community_store;
mod event_store;
mod profile_store;
mod query_support;

pub use community_store::{CommunityQuery, CommunityStore, InMemoryCommunityStore};
pub use event_store::{EventStore, InMemoryEventStore};
pub use profile_store::{HistoricProfileQuery, InMemoryProfileStore, ProfileStore};
pub use query_support::{Page, SortDirection};
