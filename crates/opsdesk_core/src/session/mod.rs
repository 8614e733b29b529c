//! Session context and request lifetime helpers.
//!
//! # Responsibility
//! - Gate every core operation on an explicit signed-in identity.
//! - Provide the ignore-late-result mechanism for abandoned calls.

pub mod context;
pub mod gate;

pub use context::{Identity, IdentityProvider, SessionContext};
pub use gate::{RequestGate, RequestTicket};
