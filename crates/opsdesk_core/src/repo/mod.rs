//! Repository layer.
//!
//! # Responsibility
//! - Expose one generic CRUD facade keyed by resource kind.
//! - Isolate store query details from aggregation and presentation callers.
//!
//! # Invariants
//! - Every operation requires a signed-in `SessionContext`.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`, ...)
//!   in addition to store transport errors.

pub mod record_repo;

pub use record_repo::{ListQuery, RecordRepository};
