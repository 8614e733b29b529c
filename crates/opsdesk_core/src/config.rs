//! Core runtime configuration.
//!
//! # Responsibility
//! - Hold the knobs embedding applications pass into the core: logging,
//!   database location and list limits.
//! - Load them from JSON with per-field defaults.
//!
//! # Invariants
//! - `0 < list_default_limit <= list_max_limit`.
//! - `upcoming_limit > 0`.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DEFAULT_LIST_LIMIT: u32 = 50;
const MAX_LIST_LIMIT: u32 = 500;
const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub log_level: String,
    /// Absolute directory for rolling logs; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
    /// SQLite file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub list_default_limit: u32,
    pub list_max_limit: u32,
    /// Number of meetings shown by the progress overview.
    pub upcoming_limit: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            list_default_limit: DEFAULT_LIST_LIMIT,
            list_max_limit: MAX_LIST_LIMIT,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.list_default_limit == 0 {
            return Err(ConfigError::Invalid(
                "list_default_limit must be positive".to_string(),
            ));
        }
        if self.list_default_limit > self.list_max_limit {
            return Err(ConfigError::Invalid(format!(
                "list_default_limit {} exceeds list_max_limit {}",
                self.list_default_limit, self.list_max_limit
            )));
        }
        if self.upcoming_limit == 0 {
            return Err(ConfigError::Invalid(
                "upcoming_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn list_limits(&self) -> ListLimits {
        ListLimits {
            default: self.list_default_limit,
            max: self.list_max_limit,
        }
    }
}

/// Default and ceiling applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub default: u32,
    pub max: u32,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_LIST_LIMIT,
            max: MAX_LIST_LIMIT,
        }
    }
}

impl ListLimits {
    /// Missing limit -> default; zero -> default; larger than max -> max.
    pub fn normalize(&self, limit: Option<u32>) -> u32 {
        match limit {
            Some(0) | None => self.default,
            Some(value) => value.min(self.max),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ListLimits};

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CoreConfig::from_json_str(r#"{ "list_limit": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_above_max_is_invalid() {
        let err = CoreConfig::from_json_str(
            r#"{ "list_default_limit": 100, "list_max_limit": 10 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn limits_normalize_missing_zero_and_oversized() {
        let limits = ListLimits { default: 20, max: 100 };
        assert_eq!(limits.normalize(None), 20);
        assert_eq!(limits.normalize(Some(0)), 20);
        assert_eq!(limits.normalize(Some(7)), 7);
        assert_eq!(limits.normalize(Some(1000)), 100);
    }
}
