//! Late-result gate for abandoned requests.
//!
//! # Responsibility
//! - Let a view mark in-flight requests as stale when it goes away or
//!   re-issues the same request.
//! - Drop results that arrive after their ticket went stale.
//!
//! # Invariants
//! - Only the most recently issued ticket is current.
//! - `accept` never mutates anything but the gate's own counters.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation-based gate shared between a view and its request tasks.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    generation: Arc<AtomicU64>,
}

/// Ticket handed to one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    gate: Arc<AtomicU64>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new current ticket; all earlier tickets become stale.
    pub fn issue(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        RequestTicket {
            generation,
            gate: Arc::clone(&self.generation),
        }
    }

    /// Invalidates every outstanding ticket (caller stopped listening).
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Passes `result` through only when `ticket` is still current.
    pub fn accept<T>(&self, ticket: &RequestTicket, result: T) -> Option<T> {
        if ticket.is_current() && Arc::ptr_eq(&ticket.gate, &self.generation) {
            return Some(result);
        }
        debug!(
            "event=late_result_dropped module=session status=ok ticket={}",
            ticket.generation
        );
        None
    }
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.gate.load(Ordering::Acquire) == self.generation
    }
}
