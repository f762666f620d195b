// Copyright 2025 Cowboy AI, LLC.

//! Time source used for timestamps and birth date checks

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Provides the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    /// Seconds since midnight, January 1, 1970 UTC
    fn now_ts(&self) -> i64;

    /// Current UTC date
    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp(self.now_ts(), 0)
            .map(|instant| instant.date_naive())
            .unwrap_or_default()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ts(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    ts: i64,
}

impl FixedClock {
    /// Clock stopped at `ts` seconds since the epoch
    pub fn at(ts: i64) -> Self {
        Self { ts }
    }

    /// Clock stopped at midday of `date`
    pub fn on(date: NaiveDate) -> Self {
        let ts = date
            .and_hms_opt(12, 0, 0)
            .map(|instant| instant.and_utc().timestamp())
            .unwrap_or_default();
        Self { ts }
    }
}

impl Clock for FixedClock {
    fn now_ts(&self) -> i64 {
        self.ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(FixedClock::at(clock.now_ts()), clock);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ts() > 1_577_836_800);
    }
}
