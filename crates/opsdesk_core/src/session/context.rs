//! Authenticated session context.
//!
//! # Responsibility
//! - Carry the signed-in identity as an explicit value passed to every
//!   repository and aggregation call.
//! - Model the sign-in/sign-out lifecycle without process-global state.
//!
//! # Invariants
//! - An `Identity` is never blank.
//! - A signed-out context yields `AccessDenied` from `require_identity()`.

use crate::error::{CoreError, CoreResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identity reference issued by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Builds an identity from an external subject id. Returns `None` for
    /// blank input.
    pub fn new(subject: impl Into<String>) -> Option<Self> {
        let subject = subject.into();
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session collaborator contract.
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Session state for one signed-in user.
///
/// Created at authentication and torn down at sign-out; operations receive
/// it by reference.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    /// A context with no signed-in identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Replaces the active identity (sign-in or account switch).
    pub fn sign_in(&mut self, identity: Identity) {
        info!("event=session_sign_in module=session status=ok");
        self.identity = Some(identity);
    }

    pub fn sign_out(&mut self) {
        if self.identity.take().is_some() {
            info!("event=session_sign_out module=session status=ok");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the identity or fails with `AccessDenied`.
    pub fn require_identity(&self) -> CoreResult<&Identity> {
        self.identity.as_ref().ok_or(CoreError::AccessDenied)
    }
}

impl IdentityProvider for SessionContext {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}
