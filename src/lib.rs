// Copyright 2025 Cowboy AI, LLC.

//! # Profile Manager
//!
//! Core of a profile manager: validation and merging of user profiles and
//! communities, and aggregation of social trust between users.
//!
//! This crate provides the building blocks of the service:
//! - **Validation Rules**: Pure field checks producing path-scoped errors
//! - **Merge Engine**: Field by field merging and list reconciliation by id
//! - **Profiles**: The user profile document and its nested entities
//! - **Communities**: Community documents and their members
//! - **Trust**: Trust events and the aggregation policies over them
//! - **Persistence**: Store ports with in-memory implementations
//! - **Manager**: Create, replace, merge and delete orchestration
//!
//! ## Design Principles
//!
//! 1. **Values, not mutation**: Merging builds a new document and never
//!    modifies the current one
//! 2. **Path-scoped errors**: Every validation error names the offending field,
//!    e.g. `profile.norms[2].attribute`
//! 3. **Injected capabilities**: Ids and time come from [`IdGenerator`] and
//!    [`Clock`], so every operation is reproducible in tests
//! 4. **Fail fast**: Store lookups run in document order and the first failure
//!    aborts the operation before anything is written

#![warn(missing_docs)]

mod clock;
mod errors;
mod identifiers;
mod manager;

pub mod community;
pub mod config;
pub mod merge;
pub mod persistence;
pub mod profile;
pub mod trust;
pub mod validation;

// Re-export core types
pub use clock::{Clock, FixedClock, SystemClock};
pub use community::{CommunityMember, CommunityProfile};
pub use config::{PagingConfig, ProfileManagerConfig, TrustConfig};
pub use errors::{DomainError, DomainResult};
pub use identifiers::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use manager::ProfileManager;
pub use merge::{Identity, MergeableEntity, ReferenceChecked, ValidationContext};
pub use persistence::{
    CommunityQuery, CommunityStore, EventStore, HistoricProfileQuery, InMemoryCommunityStore,
    InMemoryEventStore, InMemoryProfileStore, Page, ProfileStore, SortDirection,
};
pub use profile::{HistoricProfile, UserProfile};
pub use trust::{Trust, TrustAggregationEngine, TrustAggregator, TrustEvent, TrustQuery};
