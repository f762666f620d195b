// Copyright 2025 Cowboy AI, LLC.

//! Social trust between users
//!
//! Users report [`TrustEvent`]s rating other users. A trust score is the
//! aggregation of the ratings of the events selected by a [`TrustQuery`].

mod aggregator;
mod event;
mod query;

pub use aggregator::{aggregate, TrustAggregationEngine, TrustAggregator};
pub use event::TrustEvent;
pub use query::{Matcher, TrustFilter, TrustQuery};

use serde::{Deserialize, Serialize};

/// A calculated trust score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trust {
    /// The score
    pub value: f64,
    /// Epoch seconds when the score was calculated
    pub calculated_time: i64,
}
