//! Core error taxonomy.
//!
//! # Responsibility
//! - Give every engine failure one structured variant callers can match on.
//! - Keep transport failures distinct from semantic ones.
//!
//! # Invariants
//! - Errors are returned, never swallowed; the core performs no retries.

use crate::model::kind::ResourceKind;
use crate::model::record::RecordId;
use crate::model::validation::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub enum CoreError {
    /// No signed-in identity.
    AccessDenied,
    /// Missing or malformed field.
    Validation(ValidationError),
    /// Status is not accepted for the kind.
    InvalidTransition {
        kind: ResourceKind,
        status: String,
    },
    /// Operation not defined for the kind.
    UnsupportedOperation {
        kind: ResourceKind,
        operation: &'static str,
    },
    /// Id not visible in the caller's scope, or already deleted.
    NotFound {
        kind: ResourceKind,
        id: RecordId,
    },
    Store(StoreError),
    /// Tag names no declared kind.
    UnknownKind(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "access denied: no authenticated session"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTransition { kind, status } => {
                write!(f, "invalid status `{status}` for kind `{kind}`")
            }
            Self::UnsupportedOperation { kind, operation } => {
                write!(f, "operation `{operation}` is not supported for kind `{kind}`")
            }
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownKind(tag) => write!(f, "unknown resource kind `{tag}`"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CoreError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl CoreError {
    /// Stable machine-readable code for logs and presentation mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::Validation(_) => "validation_error",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::NotFound { .. } => "not_found",
            Self::Store(_) => "store_error",
            Self::UnknownKind(_) => "unknown_kind",
        }
    }
}
