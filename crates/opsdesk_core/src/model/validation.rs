//! Field-level validation shared by builders, JSON payloads and read paths.
//!
//! # Invariants
//! - Every failure names the offending field.
//! - Dates parse as `YYYY-MM-DD`; instants as RFC 3339 or naive UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Required field missing or blank after trim.
    Missing,
    /// Value present but malformed; carries a short description.
    Invalid(String),
    /// Field not declared by the kind's schema.
    Unknown,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::Missing,
        }
    }

    pub fn invalid(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::Invalid(details.into()),
        }
    }

    pub fn unknown(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: ValidationReason::Unknown,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            ValidationReason::Missing => write!(f, "field `{}` is required", self.field),
            ValidationReason::Invalid(details) => {
                write!(f, "field `{}` is invalid: {details}", self.field)
            }
            ValidationReason::Unknown => write!(f, "field `{}` is not declared", self.field),
        }
    }
}

impl Error for ValidationError {}

/// Trims a required text value, rejecting blank input.
pub fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text value; blank input collapses to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Minimal email shape check: one `@` with non-empty local and domain parts.
pub fn check_email(field: &str, value: &str) -> Result<(), ValidationError> {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::invalid(field, "expected an email address")),
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid(field, format!("`{}` is not a YYYY-MM-DD date", value.trim())))
}

/// Parses an instant. Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]`
/// value read as UTC (the shape produced by `datetime-local` inputs).
pub fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ValidationError::invalid(
        field,
        format!("`{trimmed}` is not a valid instant"),
    ))
}

#[cfg(test)]
mod tests {
    use super::{check_email, optional_text, parse_date, parse_instant, require_text, ValidationReason};

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text("name", "   ").unwrap_err();
        assert_eq!(err.field, "name");
        assert_eq!(err.reason, ValidationReason::Missing);
        assert_eq!(require_text("name", " Acme ").unwrap(), "Acme");
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" x ")).as_deref(), Some("x"));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn email_shape_check() {
        assert!(check_email("email", "a@b.io").is_ok());
        assert!(check_email("email", "nobody").is_err());
        assert!(check_email("email", "@b.io").is_err());
    }

    #[test]
    fn instants_accept_rfc3339_and_naive_forms() {
        let rfc = parse_instant("datetime", "2026-03-01T10:00:00-03:00").unwrap();
        let naive = parse_instant("datetime", "2026-03-01T13:00").unwrap();
        assert_eq!(rfc, naive);
        assert!(parse_instant("datetime", "tomorrow").is_err());
    }

    #[test]
    fn dates_reject_impossible_days() {
        assert!(parse_date("dueDate", "2026-02-28").is_ok());
        let err = parse_date("dueDate", "2026-02-30").unwrap_err();
        assert!(matches!(err.reason, ValidationReason::Invalid(_)));
    }
}
