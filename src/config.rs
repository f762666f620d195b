// Copyright 2025 Cowboy AI, LLC.

//! Runtime configuration of the profile manager
//!
//! ```toml
//! [trust]
//! recency_window = 5
//! default_aggregator = "RECENCY_BASED"
//!
//! [paging]
//! default_limit = 10
//! max_limit = 100
//! ```

use crate::errors::{DomainError, DomainResult};
use crate::trust::TrustAggregator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileManagerConfig {
    /// Trust calculation settings
    pub trust: TrustConfig,
    /// Search paging settings
    pub paging: PagingConfig,
}

/// How trust scores are calculated when the caller does not say
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Number of most recent events averaged by `RECENCY_BASED`
    pub recency_window: usize,
    /// Aggregator used when a request names none
    pub default_aggregator: TrustAggregator,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            recency_window: 5,
            default_aggregator: TrustAggregator::RecencyBased,
        }
    }
}

/// Page size limits for searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Limit used when the request names none
    pub default_limit: usize,
    /// Largest page a request may ask for
    pub max_limit: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl PagingConfig {
    /// Normalise a requested page into `(offset, limit)`
    ///
    /// A missing limit becomes `default_limit`, a zero or oversized limit is
    /// capped to `max_limit`.
    pub fn clamp(&self, offset: Option<usize>, limit: Option<usize>) -> (usize, usize) {
        let limit = match limit {
            None => self.default_limit,
            Some(0) => self.max_limit,
            Some(limit) => limit.min(self.max_limit),
        };
        (offset.unwrap_or(0), limit)
    }
}

impl ProfileManagerConfig {
    /// Parse and check a TOML document
    pub fn from_toml_str(source: &str) -> DomainResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| DomainError::ConfigurationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and check a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            DomainError::ConfigurationError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the values are consistent
    pub fn validate(&self) -> DomainResult<()> {
        if self.trust.recency_window == 0 {
            return Err(DomainError::ConfigurationError(
                "trust.recency_window must be greater than zero".to_string(),
            ));
        }
        if self.paging.max_limit == 0 {
            return Err(DomainError::ConfigurationError(
                "paging.max_limit must be greater than zero".to_string(),
            ));
        }
        if self.paging.default_limit == 0 || self.paging.default_limit > self.paging.max_limit {
            return Err(DomainError::ConfigurationError(format!(
                "paging.default_limit must be in [1,{}]",
                self.paging.max_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ProfileManagerConfig::default();
        assert_eq!(config.trust.recency_window, 5);
        assert_eq!(config.trust.default_aggregator, TrustAggregator::RecencyBased);
        assert_eq!(config.paging.default_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_document() {
        let config = ProfileManagerConfig::from_toml_str(
            r#"
            [trust]
            default_aggregator = "MEDIAN"
            "#,
        )
        .unwrap();
        assert_eq!(config.trust.default_aggregator, TrustAggregator::Median);
        assert_eq!(config.trust.recency_window, 5);
        assert_eq!(config.paging, PagingConfig::default());
    }

    #[test]
    fn test_rejects_inconsistent_values() {
        for source in [
            "[trust]\nrecency_window = 0",
            "[paging]\nmax_limit = 0",
            "[paging]\ndefault_limit = 20\nmax_limit = 10",
            "[trust]\ndefault_aggregator = \"MODE\"",
        ] {
            let error = ProfileManagerConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(error, DomainError::ConfigurationError(_)), "{source}");
        }
    }

    #[test]
    fn test_missing_file() {
        let error = ProfileManagerConfig::from_file("/nonexistent/profile-manager.toml").unwrap_err();
        assert!(matches!(error, DomainError::ConfigurationError(_)));
    }

    #[test]
    fn test_clamp() {
        let paging = PagingConfig::default();
        assert_eq!(paging.clamp(None, None), (0, 10));
        assert_eq!(paging.clamp(Some(5), Some(1000)), (5, 100));
        assert_eq!(paging.clamp(Some(2), Some(0)), (2, 100));
        assert_eq!(paging.clamp(Some(2), Some(7)), (2, 7));
    }
}
