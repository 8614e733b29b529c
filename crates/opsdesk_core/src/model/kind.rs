//! Resource kind tags.
//!
//! # Responsibility
//! - Name the five managed record categories with one closed enum.
//! - Map kinds to and from their stable external tags.
//!
//! # Invariants
//! - Tags are stable; they are persisted in `records.kind`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One of the managed record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "meeting")]
    Meeting,
    #[serde(rename = "onboarding")]
    Onboarding,
    #[serde(rename = "teamMember")]
    TeamMember,
}

/// Every declared kind, in dashboard display order.
pub const ALL_KINDS: [ResourceKind; 5] = [
    ResourceKind::Client,
    ResourceKind::Task,
    ResourceKind::Meeting,
    ResourceKind::Onboarding,
    ResourceKind::TeamMember,
];

impl ResourceKind {
    /// Stable external tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Task => "task",
            Self::Meeting => "meeting",
            Self::Onboarding => "onboarding",
            Self::TeamMember => "teamMember",
        }
    }

    /// Parses an external tag. Returns `None` for undeclared kinds.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "client" => Some(Self::Client),
            "task" => Some(Self::Task),
            "meeting" => Some(Self::Meeting),
            "onboarding" => Some(Self::Onboarding),
            "teamMember" => Some(Self::TeamMember),
            _ => None,
        }
    }

    pub fn all() -> &'static [ResourceKind] {
        &ALL_KINDS
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceKind, ALL_KINDS};

    #[test]
    fn tags_roundtrip_for_every_kind() {
        for kind in ALL_KINDS {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_case_mismatch() {
        assert_eq!(ResourceKind::parse("invoice"), None);
        assert_eq!(ResourceKind::parse("teammember"), None);
    }

    #[test]
    fn serde_uses_external_tags() {
        let json = serde_json::to_string(&ResourceKind::TeamMember).unwrap();
        assert_eq!(json, "\"teamMember\"");
    }
}
