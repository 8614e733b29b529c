//! Record domain model.
//!
//! # Responsibility
//! - Define the five managed resource kinds, their closed status enums and
//!   their typed field sets.
//! - Provide validated create payloads built per kind or from external JSON.
//!
//! # Invariants
//! - A status value always belongs to the kind it is attached to.
//! - A `NewRecord` has passed validation before it reaches a store.

pub mod kind;
pub mod payload;
pub mod record;
pub mod status;
pub mod validation;
