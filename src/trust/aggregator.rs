// Copyright 2025 Cowboy AI, LLC.

//! Trust score aggregation policies
//!
//! A trust score summarises the ratings of a set of events:
//!
//! | Aggregator      | Score                                               |
//! |-----------------|-----------------------------------------------------|
//! | `MAXIMUM`       | highest rating                                      |
//! | `MINIMUM`       | lowest rating                                       |
//! | `AVERAGE`       | arithmetic mean                                     |
//! | `MEDIAN`        | middle rating, the lower one when the count is even |
//! | `RECENCY_BASED` | mean of the `n` most recently reported ratings      |

use crate::errors::{DomainError, DomainResult};
use crate::persistence::EventStore;
use crate::trust::{TrustEvent, TrustQuery};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How the ratings of the selected events become a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustAggregator {
    /// Highest rating
    Maximum,
    /// Lowest rating
    Minimum,
    /// Mean of the ratings
    Average,
    /// Lower median of the ratings
    Median,
    /// Mean of the most recent ratings
    RecencyBased,
}

impl TrustAggregator {
    /// Every aggregator
    pub const ALL: [TrustAggregator; 5] = [
        TrustAggregator::Maximum,
        TrustAggregator::Minimum,
        TrustAggregator::Average,
        TrustAggregator::Median,
        TrustAggregator::RecencyBased,
    ];

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustAggregator::Maximum => "MAXIMUM",
            TrustAggregator::Minimum => "MINIMUM",
            TrustAggregator::Average => "AVERAGE",
            TrustAggregator::Median => "MEDIAN",
            TrustAggregator::RecencyBased => "RECENCY_BASED",
        }
    }
}

impl fmt::Display for TrustAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustAggregator {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        TrustAggregator::ALL
            .into_iter()
            .find(|aggregator| aggregator.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                DomainError::validation(
                    "aggregator",
                    format!("The '{value}' is not a known trust aggregator."),
                )
            })
    }
}

/// Reduce the ratings of `events` with `aggregator`
///
/// Events without rating are ignored. `recency_window` is the number of
/// events averaged by [`TrustAggregator::RecencyBased`].
///
/// # Examples
///
/// ```rust
/// use profile_manager::trust::{aggregate, TrustAggregator, TrustEvent};
///
/// let events: Vec<TrustEvent> = [0.1, 0.2, 0.3, 0.4]
///     .into_iter()
///     .map(|rating| TrustEvent::rating("1", "2", rating))
///     .collect();
///
/// assert_eq!(aggregate(TrustAggregator::Maximum, &events, 5).unwrap(), 0.4);
/// // even count: the lower of the two middle ratings
/// assert_eq!(aggregate(TrustAggregator::Median, &events, 5).unwrap(), 0.2);
/// assert!(aggregate(TrustAggregator::Average, &[], 5).is_err());
/// ```
pub fn aggregate(
    aggregator: TrustAggregator,
    events: &[TrustEvent],
    recency_window: usize,
) -> DomainResult<f64> {
    let rated: Vec<&TrustEvent> = events.iter().filter(|event| event.rating.is_some()).collect();
    if rated.is_empty() {
        return Err(DomainError::NoMatchingEvents);
    }
    let ratings = || rated.iter().filter_map(|event| event.rating);
    let score = match aggregator {
        TrustAggregator::Maximum => ratings().fold(f64::NEG_INFINITY, f64::max),
        TrustAggregator::Minimum => ratings().fold(f64::INFINITY, f64::min),
        TrustAggregator::Average => mean(ratings()),
        TrustAggregator::Median => {
            let mut sorted: Vec<f64> = ratings().collect();
            sorted.sort_by(f64::total_cmp);
            sorted[(sorted.len() - 1) / 2]
        }
        TrustAggregator::RecencyBased => {
            let mut recent = rated.clone();
            recent.sort_by(|a, b| b.report_time.cmp(&a.report_time));
            mean(
                recent
                    .into_iter()
                    .take(recency_window.max(1))
                    .filter_map(|event| event.rating),
            )
        }
    };
    Ok(score)
}

fn mean(ratings: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = ratings.fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));
    sum / count as f64
}

/// Calculates trust scores from the stored events
#[derive(Clone)]
pub struct TrustAggregationEngine {
    events: Arc<dyn EventStore>,
    recency_window: usize,
}

impl fmt::Debug for TrustAggregationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustAggregationEngine")
            .field("recency_window", &self.recency_window)
            .finish_non_exhaustive()
    }
}

impl TrustAggregationEngine {
    /// Engine over `events` averaging `recency_window` events when recency based
    pub fn new(events: Arc<dyn EventStore>, recency_window: usize) -> Self {
        Self {
            events,
            recency_window,
        }
    }

    /// Number of events averaged by `RECENCY_BASED`
    pub fn recency_window(&self) -> usize {
        self.recency_window
    }

    /// Score of the events selected by `query`
    ///
    /// Fails with [`DomainError::NoMatchingEvents`] when no rated event is
    /// selected.
    pub async fn calculate_trust_by(
        &self,
        aggregator: TrustAggregator,
        query: &TrustQuery,
    ) -> DomainResult<f64> {
        let events = self.events.query_events(query).await?;
        debug!(
            "Aggregating {} trust events with {}",
            events.len(),
            aggregator
        );
        aggregate(aggregator, &events, self.recency_window)
    }
}
