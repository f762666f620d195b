// Copyright 2025 Cowboy AI, LLC.

//! Field level validation rules shared by every document model
//!
//! Every rule receives the code prefix of the document being validated and the
//! name of the field. Failures are reported as
//! [`DomainError::ValidationError`] whose code is `<prefix>.<field>`. Rules
//! never panic: any malformed input is a tagged error.
//!
//! Nullable rules trim the value and return `None` for absent or blank input.

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Maximum length of an email address
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Maximum length of a locale tag
pub const MAX_LOCALE_LENGTH: usize = 50;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

static LOCALE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(_[A-Z]{2}(_[A-Za-z0-9]{1,8})?)?$").expect("locale pattern is valid")
});

static TELEPHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("telephone pattern is valid"));

/// Build the code of a field inside the document at `prefix`
pub fn field_code(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Build the code of the element at `index` of the list at `prefix`
pub fn element_code(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Trim a string and check that it has at most `max_len` characters
///
/// # Examples
///
/// ```rust
/// use profile_manager::validation::validate_nullable_string;
///
/// let value = validate_nullable_string("profile", "occupation", 255, Some("  nurse ".into()));
/// assert_eq!(value.unwrap(), Some("nurse".to_string()));
///
/// let blank = validate_nullable_string("profile", "occupation", 255, Some("   ".into()));
/// assert_eq!(blank.unwrap(), None);
///
/// let error = validate_nullable_string("profile", "prefix", 2, Some("Mrs.".into())).unwrap_err();
/// assert_eq!(error.code(), Some("profile.prefix"));
/// ```
pub fn validate_nullable_string(
    prefix: &str,
    field: &str,
    max_len: usize,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    match trimmed(value) {
        Some(value) if value.chars().count() > max_len => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{field}' can not be more than {max_len} characters."),
        )),
        other => Ok(other),
    }
}

/// Like [`validate_nullable_string`] but the value must be present
pub fn validate_string(
    prefix: &str,
    field: &str,
    max_len: usize,
    value: Option<String>,
) -> DomainResult<String> {
    validate_nullable_string(prefix, field, max_len, value)?.ok_or_else(|| {
        DomainError::validation(
            field_code(prefix, field),
            format!("The '{field}' must be defined."),
        )
    })
}

/// Like [`validate_nullable_string`] but the value must be one of `allowed`
pub fn validate_nullable_string_in(
    prefix: &str,
    field: &str,
    max_len: usize,
    value: Option<String>,
    allowed: &[&str],
) -> DomainResult<Option<String>> {
    let value = validate_nullable_string(prefix, field, max_len, value)?;
    match value {
        Some(value) if !allowed.contains(&value.as_str()) => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{value}' is not a possible value, it has to be one of {allowed:?}."),
        )),
        other => Ok(other),
    }
}

/// Trim and check an email address
pub fn validate_nullable_email(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let value = validate_nullable_string(prefix, field, MAX_EMAIL_LENGTH, value)?;
    match value {
        Some(email) if !EMAIL_PATTERN.is_match(&email) => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{email}' is not a valid email address."),
        )),
        other => Ok(other),
    }
}

/// Trim and check a locale tag such as `en_US`
pub fn validate_nullable_locale(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let value = validate_nullable_string(prefix, field, MAX_LOCALE_LENGTH, value)?;
    match value {
        Some(locale) if !LOCALE_PATTERN.is_match(&locale) => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{locale}' is not a valid locale."),
        )),
        other => Ok(other),
    }
}

fn locale_has_country(locale: Option<&str>) -> bool {
    locale
        .and_then(|locale| locale.split('_').nth(1))
        .is_some_and(|country| country.len() == 2)
}

/// Trim and check a telephone number on the E.164 format
///
/// Spaces, dashes, dots and parentheses are removed. A number without the
/// leading `+` is a local number and is only accepted when `locale` names a
/// country.
pub fn validate_nullable_telephone(
    prefix: &str,
    field: &str,
    locale: Option<&str>,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let Some(raw) = trimmed(value) else {
        return Ok(None);
    };
    let number: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect();
    if !TELEPHONE_PATTERN.is_match(&number) {
        return Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{raw}' is not a valid telephone number."),
        ));
    }
    if !number.starts_with('+') && !locale_has_country(locale) {
        return Err(DomainError::validation(
            field_code(prefix, field),
            format!("The local telephone number '{raw}' needs a locale with the country."),
        ));
    }
    Ok(Some(number))
}

/// Trim and check an absolute `http` or `https` URL
pub fn validate_nullable_url(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let Some(value) = trimmed(value) else {
        return Ok(None);
    };
    match Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(value)),
        _ => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{value}' is not a valid URL."),
        )),
    }
}

/// Trim and check an ISO-8601 instant
///
/// The value is normalised to UTC, for example `2011-12-03t10:15:30z` becomes
/// `2011-12-03T10:15:30Z`.
pub fn validate_nullable_instant(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let Some(value) = trimmed(value) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&value.to_uppercase())
        .map(|instant| {
            Some(
                instant
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )
        })
        .map_err(|_| {
            DomainError::validation(
                field_code(prefix, field),
                format!("The '{value}' is not a valid ISO-8601 instant."),
            )
        })
}

/// Trim and check an ISO-8601 local time (`HH:MM` or `HH:MM:SS`)
pub fn validate_nullable_time(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let Some(value) = trimmed(value) else {
        return Ok(None);
    };
    let parsed = NaiveTime::parse_from_str(&value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M"));
    match parsed {
        Ok(_) => Ok(Some(value)),
        Err(_) => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{value}' is not a valid ISO-8601 time."),
        )),
    }
}

/// Trim and check an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn validate_nullable_date(
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> DomainResult<Option<String>> {
    let Some(value) = trimmed(value) else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        Ok(_) => Ok(Some(value)),
        Err(_) => Err(DomainError::validation(
            field_code(prefix, field),
            format!("The '{value}' is not a valid ISO-8601 date."),
        )),
    }
}

/// Check that a number lies in the closed interval `[min, max]`
pub fn validate_range(
    prefix: &str,
    field: &str,
    min: f64,
    max: f64,
    value: Option<f64>,
) -> DomainResult<Option<f64>> {
    match value {
        Some(number) if number.is_nan() || number < min || number > max => {
            Err(DomainError::validation(
                field_code(prefix, field),
                format!("The '{field}' has to be on the range [{min},{max}]."),
            ))
        }
        other => Ok(other),
    }
}
