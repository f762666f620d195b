// Copyright 2025 Cowboy AI, LLC.

//! Archived versions of a profile

use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};

/// The state a profile had between two instants
///
/// Snapshots are written once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricProfile {
    /// Epoch seconds when this state started
    pub from: i64,
    /// Epoch seconds when this state was replaced
    pub to: i64,
    /// The archived profile
    pub profile: UserProfile,
}

impl HistoricProfile {
    /// Archive `profile` as replaced at `to`
    ///
    /// The state started at the last update of the profile.
    pub fn archive(profile: UserProfile, to: i64) -> Self {
        Self {
            from: profile.last_update_ts,
            to,
            profile,
        }
    }

    /// Id of the archived profile
    pub fn profile_id(&self) -> Option<&str> {
        self.profile.id.as_deref()
    }
}
