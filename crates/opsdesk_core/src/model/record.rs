//! Typed record model.
//!
//! # Responsibility
//! - Define the per-kind field sets as one closed sum type.
//! - Define the stored `Record` envelope (id, owner, creation time, fields).
//!
//! # Invariants
//! - `RecordFields::kind()` always matches the variant.
//! - Required text fields are non-blank once `validate()` passes.
//! - Field JSON keys match the schema registry names (`camelCase`).

use crate::model::kind::ResourceKind;
use crate::model::status::{ClientStatus, OnboardingStatus, Status, TaskPriority, TaskStatus};
use crate::model::validation::{check_email, optional_text, ValidationError};
use crate::session::Identity;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned record identifier.
pub type RecordId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingFields {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Persisted as epoch milliseconds so range filters compare numerically.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingFields {
    pub client_name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: OnboardingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberFields {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

/// Kind-specific field set of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFields {
    Client(ClientFields),
    Task(TaskFields),
    Meeting(MeetingFields),
    Onboarding(OnboardingFields),
    TeamMember(TeamMemberFields),
}

impl RecordFields {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Client(_) => ResourceKind::Client,
            Self::Task(_) => ResourceKind::Task,
            Self::Meeting(_) => ResourceKind::Meeting,
            Self::Onboarding(_) => ResourceKind::Onboarding,
            Self::TeamMember(_) => ResourceKind::TeamMember,
        }
    }

    /// Current status, for kinds that declare one.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Client(fields) => Some(Status::Client(fields.status)),
            Self::Task(fields) => Some(Status::Task(fields.status)),
            Self::Onboarding(fields) => Some(Status::Onboarding(fields.status)),
            Self::Meeting(_) | Self::TeamMember(_) => None,
        }
    }

    /// Canonical stored form: text trimmed, blank optionals collapsed to
    /// `None`, meeting instants truncated to whole milliseconds.
    pub fn normalized(self) -> Self {
        match self {
            Self::Client(fields) => Self::Client(ClientFields {
                name: fields.name.trim().to_string(),
                email: optional_text(fields.email.as_deref()),
                phone: optional_text(fields.phone.as_deref()),
                company: optional_text(fields.company.as_deref()),
                status: fields.status,
            }),
            Self::Task(fields) => Self::Task(TaskFields {
                title: fields.title.trim().to_string(),
                description: optional_text(fields.description.as_deref()),
                ..fields
            }),
            Self::Meeting(fields) => Self::Meeting(MeetingFields {
                title: fields.title.trim().to_string(),
                description: optional_text(fields.description.as_deref()),
                datetime: fields.datetime.trunc_subsecs(3),
                location: optional_text(fields.location.as_deref()),
                participants: fields
                    .participants
                    .iter()
                    .filter_map(|name| optional_text(Some(name)))
                    .collect(),
            }),
            Self::Onboarding(fields) => Self::Onboarding(OnboardingFields {
                client_name: fields.client_name.trim().to_string(),
                current_stage: optional_text(fields.current_stage.as_deref()),
                notes: optional_text(fields.notes.as_deref()),
                ..fields
            }),
            Self::TeamMember(fields) => Self::TeamMember(TeamMemberFields {
                name: fields.name.trim().to_string(),
                email: fields.email.trim().to_string(),
                role: optional_text(fields.role.as_deref()),
                department: optional_text(fields.department.as_deref()),
                phone: optional_text(fields.phone.as_deref()),
                hire_date: fields.hire_date,
            }),
        }
    }

    /// Checks required-ness and field shapes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Client(fields) => {
                require_non_blank("name", &fields.name)?;
                if let Some(email) = fields.email.as_deref() {
                    check_email("email", email)?;
                }
            }
            Self::Task(fields) => require_non_blank("title", &fields.title)?,
            Self::Meeting(fields) => require_non_blank("title", &fields.title)?,
            Self::Onboarding(fields) => require_non_blank("clientName", &fields.client_name)?,
            Self::TeamMember(fields) => {
                require_non_blank("name", &fields.name)?;
                require_non_blank("email", &fields.email)?;
                check_email("email", &fields.email)?;
            }
        }
        Ok(())
    }

    /// Serializes to the persisted JSON object.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Self::Client(fields) => serde_json::to_value(fields),
            Self::Task(fields) => serde_json::to_value(fields),
            Self::Meeting(fields) => serde_json::to_value(fields),
            Self::Onboarding(fields) => serde_json::to_value(fields),
            Self::TeamMember(fields) => serde_json::to_value(fields),
        }
    }

    /// Deserializes a persisted JSON object for `kind`.
    pub fn from_json(kind: ResourceKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ResourceKind::Client => Self::Client(serde_json::from_value(value)?),
            ResourceKind::Task => Self::Task(serde_json::from_value(value)?),
            ResourceKind::Meeting => Self::Meeting(serde_json::from_value(value)?),
            ResourceKind::Onboarding => Self::Onboarding(serde_json::from_value(value)?),
            ResourceKind::TeamMember => Self::TeamMember(serde_json::from_value(value)?),
        })
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// Persisted record as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// Set at creation; never rewritten.
    pub owner: Identity,
    /// Unix epoch milliseconds, store-assigned.
    pub created_at: i64,
    pub fields: RecordFields,
}

impl Record {
    pub fn kind(&self) -> ResourceKind {
        self.fields.kind()
    }

    pub fn status(&self) -> Option<Status> {
        self.fields.status()
    }

    pub fn as_meeting(&self) -> Option<&MeetingFields> {
        match &self.fields {
            RecordFields::Meeting(fields) => Some(fields),
            _ => None,
        }
    }
}
