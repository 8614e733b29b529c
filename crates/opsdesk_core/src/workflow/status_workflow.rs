//! Status change validation.
//!
//! # Responsibility
//! - Reject status updates on kinds without a status enum.
//! - Parse requested statuses against the kind's enum.
//! - Consult a pluggable transition policy before a change is applied.
//!
//! # Invariants
//! - A rejected change never reaches the store.
//! - The default policy accepts any declared status from any declared status,
//!   including itself.

use crate::error::{CoreError, CoreResult};
use crate::model::kind::ResourceKind;
use crate::model::status::{Status, StatusParseError};
use crate::store::StorePatch;
use serde_json::Value;
use std::collections::BTreeSet;

const STATUS_FIELD: &str = "status";

/// Decides whether `from -> to` is allowed. Both values are already known to
/// belong to the same kind.
pub trait TransitionPolicy {
    fn allows(&self, from: Status, to: Status) -> bool;
}

/// Any declared status may follow any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl TransitionPolicy for Unrestricted {
    fn allows(&self, _from: Status, _to: Status) -> bool {
        true
    }
}

/// Explicit edge list. Self-transitions are always allowed.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    edges: BTreeSet<(Status, Status)>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, from: impl Into<Status>, to: impl Into<Status>) -> Self {
        self.edges.insert((from.into(), to.into()));
        self
    }
}

impl TransitionPolicy for TransitionTable {
    fn allows(&self, from: Status, to: Status) -> bool {
        from == to || self.edges.contains(&(from, to))
    }
}

/// Validates and prepares status changes.
#[derive(Debug, Clone, Default)]
pub struct StatusWorkflow<P: TransitionPolicy = Unrestricted> {
    policy: P,
}

impl StatusWorkflow<Unrestricted> {
    pub fn unrestricted() -> Self {
        Self {
            policy: Unrestricted,
        }
    }
}

impl<P: TransitionPolicy> StatusWorkflow<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Fails `UnsupportedOperation` for kinds without a status enum.
    pub fn ensure_supported(&self, kind: ResourceKind) -> CoreResult<()> {
        match Status::declared(kind) {
            Some(_) => Ok(()),
            None => Err(CoreError::UnsupportedOperation {
                kind,
                operation: "update_status",
            }),
        }
    }

    /// Parses an external status for `kind`.
    ///
    /// # Errors
    /// - `UnsupportedOperation` when `kind` has no status enum.
    /// - `InvalidTransition` when `requested` is not declared for `kind`.
    pub fn parse_target(&self, kind: ResourceKind, requested: &str) -> CoreResult<Status> {
        Status::parse(kind, requested).map_err(|err| match err {
            StatusParseError::NoStatusEnum(kind) => CoreError::UnsupportedOperation {
                kind,
                operation: "update_status",
            },
            StatusParseError::NotMember { kind, value } => {
                CoreError::InvalidTransition { kind, status: value }
            }
        })
    }

    /// Checks `current -> target` against the kind and the policy.
    pub fn check(&self, kind: ResourceKind, current: Status, target: Status) -> CoreResult<()> {
        if target.kind() != kind || !self.policy.allows(current, target) {
            return Err(CoreError::InvalidTransition {
                kind,
                status: target.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Store patch that applies `target`.
    pub fn patch_for(&self, target: Status) -> StorePatch {
        let mut patch = StorePatch::new();
        patch.insert(
            STATUS_FIELD.to_string(),
            Value::String(target.as_str().to_string()),
        );
        patch
    }
}
