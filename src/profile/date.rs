// Copyright 2025 Cowboy AI, LLC.

//! Calendar dates split in year, month and day

use crate::clock::Clock;
use crate::errors::{DomainError, DomainResult};
use crate::validation::field_code;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Earliest accepted date of birth
pub const MIN_BIRTH_DATE: (i32, u32, u32) = (1903, 1, 2);

/// A date whose parts may be unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDate {
    /// Year of the date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Month from 1 (January) to 12 (December)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    /// Day of the month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

impl ProfileDate {
    /// A complete date
    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }

    /// Same as [`ProfileDate::ymd`] from a chrono date
    pub fn from_naive(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::ymd(date.year(), date.month() as u8, date.day() as u8)
    }

    /// The date when every part is known
    pub fn to_naive(&self) -> Option<NaiveDate> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => {
                NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
            }
            _ => None,
        }
    }

    /// Check every known part is in range and a complete date exists
    pub fn validate(self, prefix: &str) -> DomainResult<Self> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(DomainError::validation(
                    field_code(prefix, "month"),
                    "The month has to be on the range [1,12]",
                ));
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(DomainError::validation(
                    field_code(prefix, "day"),
                    "The day has to be on the range [1,31]",
                ));
            }
        }
        if self.year.is_some() && self.month.is_some() && self.day.is_some() && self.to_naive().is_none() {
            return Err(DomainError::validation(
                prefix,
                "The date does not exist on the calendar",
            ));
        }
        Ok(self)
    }

    /// Validate a date of birth of someone alive
    ///
    /// A complete date must be between 1903-01-02 and today, both included.
    pub fn validate_birth_date(self, prefix: &str, clock: &dyn Clock) -> DomainResult<Self> {
        let date = self.validate(prefix)?;
        if let Some(birth) = date.to_naive() {
            let (year, month, day) = MIN_BIRTH_DATE;
            let earliest = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);
            if birth < earliest {
                return Err(DomainError::validation(
                    prefix,
                    format!("The birth date can not be before {earliest}."),
                ));
            }
            if birth > clock.today() {
                return Err(DomainError::validation(
                    prefix,
                    "The birth date can not be on the future.",
                ));
            }
        }
        Ok(date)
    }

    /// Overlay the present parts of `source`
    pub fn merge_parts(&self, source: Self) -> Self {
        Self {
            year: source.year.or(self.year),
            month: source.month.or(self.month),
            day: source.day.or(self.day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test_case(1903, 1, 2, true ; "earliest day")]
    #[test_case(1903, 1, 1, false ; "before earliest day")]
    #[test_case(2024, 6, 15, true ; "today")]
    #[test_case(2024, 6, 16, false ; "tomorrow")]
    #[test_case(1980, 2, 29, true ; "leap day")]
    fn test_birth_date_bounds(year: i32, month: u8, day: u8, valid: bool) {
        let clock = FixedClock::on(today());
        let result = ProfileDate::ymd(year, month, day).validate_birth_date("profile.dateOfBirth", &clock);
        assert_eq!(result.is_ok(), valid, "{result:?}");
        if let Err(error) = result {
            assert_eq!(error.code(), Some("profile.dateOfBirth"));
        }
    }

    #[test_case(ProfileDate { month: Some(13), ..Default::default() }, "d.month" ; "month after december")]
    #[test_case(ProfileDate { month: Some(0), ..Default::default() }, "d.month" ; "month zero")]
    #[test_case(ProfileDate { day: Some(32), ..Default::default() }, "d.day" ; "day after 31")]
    #[test_case(ProfileDate::ymd(2021, 2, 29), "d" ; "missing leap day")]
    fn test_invalid_parts(date: ProfileDate, code: &str) {
        assert_eq!(date.validate("d").unwrap_err().code(), Some(code));
    }

    #[test]
    fn test_partial_dates_are_allowed() {
        let clock = FixedClock::on(today());
        let partial = ProfileDate {
            year: Some(1800),
            ..Default::default()
        };
        assert_eq!(partial.validate_birth_date("d", &clock).unwrap(), partial);
    }

    #[test]
    fn test_merge_parts() {
        let current = ProfileDate::ymd(1990, 1, 1);
        let source = ProfileDate {
            day: Some(20),
            ..Default::default()
        };
        assert_eq!(current.merge_parts(source), ProfileDate::ymd(1990, 1, 20));
        assert_eq!(ProfileDate::from_naive(today()).to_naive(), Some(today()));
    }
}
