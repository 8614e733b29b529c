//! Status workflow.
//!
//! # Responsibility
//! - Own the rule set for which status values are valid per kind and which
//!   transitions between them are allowed.

pub mod status_workflow;

pub use status_workflow::{StatusWorkflow, TransitionPolicy, TransitionTable, Unrestricted};
