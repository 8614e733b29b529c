//! Closed status and priority enums per resource kind.
//!
//! # Responsibility
//! - Model every kind's status set as a tagged variant, not a free string.
//! - Parse external status strings against the owning kind.
//!
//! # Invariants
//! - A `Status` value always belongs to the kind reported by `Status::kind()`.
//! - Kinds without a status enum (`meeting`, `teamMember`) have no `Status`.

use crate::model::kind::ResourceKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Client relationship state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    InProgress,
    Done,
}

/// Onboarding process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    InProgress,
    Done,
    Paused,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Status of any kind that declares one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Client(ClientStatus),
    Task(TaskStatus),
    Onboarding(OnboardingStatus),
}

const CLIENT_STATUSES: &[Status] = &[
    Status::Client(ClientStatus::Active),
    Status::Client(ClientStatus::Inactive),
];

const TASK_STATUSES: &[Status] = &[
    Status::Task(TaskStatus::Pending),
    Status::Task(TaskStatus::InProgress),
    Status::Task(TaskStatus::Done),
];

const ONBOARDING_STATUSES: &[Status] = &[
    Status::Onboarding(OnboardingStatus::InProgress),
    Status::Onboarding(OnboardingStatus::Done),
    Status::Onboarding(OnboardingStatus::Paused),
];

impl Status {
    /// Kind that owns this status value.
    pub fn kind(self) -> ResourceKind {
        match self {
            Self::Client(_) => ResourceKind::Client,
            Self::Task(_) => ResourceKind::Task,
            Self::Onboarding(_) => ResourceKind::Onboarding,
        }
    }

    /// Stable persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client(ClientStatus::Active) => "active",
            Self::Client(ClientStatus::Inactive) => "inactive",
            Self::Task(TaskStatus::Pending) => "pending",
            Self::Task(TaskStatus::InProgress) => "in_progress",
            Self::Task(TaskStatus::Done) => "done",
            Self::Onboarding(OnboardingStatus::InProgress) => "in_progress",
            Self::Onboarding(OnboardingStatus::Done) => "done",
            Self::Onboarding(OnboardingStatus::Paused) => "paused",
        }
    }

    /// Declared status values for `kind`, or `None` when the kind has no
    /// status enum.
    pub fn declared(kind: ResourceKind) -> Option<&'static [Status]> {
        match kind {
            ResourceKind::Client => Some(CLIENT_STATUSES),
            ResourceKind::Task => Some(TASK_STATUSES),
            ResourceKind::Onboarding => Some(ONBOARDING_STATUSES),
            ResourceKind::Meeting | ResourceKind::TeamMember => None,
        }
    }

    /// Status assigned on create when the payload omits one.
    pub fn default_for(kind: ResourceKind) -> Option<Status> {
        match kind {
            ResourceKind::Client => Some(Self::Client(ClientStatus::Active)),
            ResourceKind::Task => Some(Self::Task(TaskStatus::Pending)),
            ResourceKind::Onboarding => Some(Self::Onboarding(OnboardingStatus::InProgress)),
            ResourceKind::Meeting | ResourceKind::TeamMember => None,
        }
    }

    /// Parses an external status string for `kind`.
    ///
    /// # Errors
    /// - `StatusParseError::NoStatusEnum` when `kind` declares no statuses.
    /// - `StatusParseError::NotMember` when `value` is not declared for `kind`.
    pub fn parse(kind: ResourceKind, value: &str) -> Result<Status, StatusParseError> {
        let declared = Self::declared(kind).ok_or(StatusParseError::NoStatusEnum(kind))?;
        let trimmed = value.trim();
        declared
            .iter()
            .copied()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| StatusParseError::NotMember {
                kind,
                value: trimmed.to_string(),
            })
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClientStatus> for Status {
    fn from(value: ClientStatus) -> Self {
        Self::Client(value)
    }
}

impl From<TaskStatus> for Status {
    fn from(value: TaskStatus) -> Self {
        Self::Task(value)
    }
}

impl From<OnboardingStatus> for Status {
    fn from(value: OnboardingStatus) -> Self {
        Self::Onboarding(value)
    }
}

/// Status parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusParseError {
    NoStatusEnum(ResourceKind),
    NotMember { kind: ResourceKind, value: String },
}

impl Display for StatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStatusEnum(kind) => write!(f, "kind `{kind}` declares no status enum"),
            Self::NotMember { kind, value } => {
                write!(f, "status `{value}` is not declared for kind `{kind}`")
            }
        }
    }
}

impl Error for StatusParseError {}
