//! Declarative per-kind schemas.
//!
//! # Responsibility
//! - Declare each kind's fields, required markers, defaults, status enum and
//!   default list order.
//! - Resolve kinds by external tag.
//!
//! # Invariants
//! - Lookups are pure and read-only.
//! - Field names equal the persisted JSON keys of `RecordFields`.
//! - A field typed `Status` exists iff the kind declares a status enum.

use crate::error::{CoreError, CoreResult};
use crate::model::kind::ResourceKind;
use crate::model::status::Status;

/// Value type of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Email,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Instant, persisted as epoch milliseconds.
    DateTime,
    /// Closed set of string values.
    Choice(&'static [&'static str]),
    /// The kind's status enum.
    Status,
    /// List of names; accepts an array or a comma-separated string.
    TextList,
}

/// One declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Applied on create when the payload omits the field.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            default: None,
        }
    }

    const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            default: None,
        }
    }

    const fn defaulted(name: &'static str, field_type: FieldType, default: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: false,
            default: Some(default),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering key for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl OrderBy {
    pub const fn newest_first() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }

    pub const fn ascending(field: &'static str) -> Self {
        Self {
            key: SortKey::Field(field),
            direction: SortDirection::Asc,
        }
    }

    pub const fn descending(field: &'static str) -> Self {
        Self {
            key: SortKey::Field(field),
            direction: SortDirection::Desc,
        }
    }
}

/// Schema of one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: ResourceKind,
    pub fields: &'static [FieldSpec],
    pub default_order: OrderBy,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Declared status values, or `None` for kinds without a status enum.
    pub fn statuses(&self) -> Option<&'static [Status]> {
        Status::declared(self.kind)
    }

    pub fn default_status(&self) -> Option<Status> {
        Status::default_for(self.kind)
    }

    pub fn has_status(&self) -> bool {
        self.statuses().is_some()
    }
}

pub const PRIORITY_VALUES: &[&str] = &["low", "medium", "high"];

const CLIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldType::Text),
    FieldSpec::optional("email", FieldType::Email),
    FieldSpec::optional("phone", FieldType::Text),
    FieldSpec::optional("company", FieldType::Text),
    FieldSpec::defaulted("status", FieldType::Status, "active"),
];

const TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldType::Text),
    FieldSpec::optional("description", FieldType::Text),
    FieldSpec::defaulted("priority", FieldType::Choice(PRIORITY_VALUES), "medium"),
    FieldSpec::optional("dueDate", FieldType::Date),
    FieldSpec::defaulted("status", FieldType::Status, "pending"),
];

const MEETING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldType::Text),
    FieldSpec::optional("description", FieldType::Text),
    FieldSpec::required("datetime", FieldType::DateTime),
    FieldSpec::optional("location", FieldType::Text),
    FieldSpec::optional("participants", FieldType::TextList),
];

const ONBOARDING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("clientName", FieldType::Text),
    FieldSpec::required("startDate", FieldType::Date),
    FieldSpec::optional("currentStage", FieldType::Text),
    FieldSpec::optional("notes", FieldType::Text),
    FieldSpec::defaulted("status", FieldType::Status, "in_progress"),
];

const TEAM_MEMBER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldType::Text),
    FieldSpec::required("email", FieldType::Email),
    FieldSpec::optional("role", FieldType::Text),
    FieldSpec::optional("department", FieldType::Text),
    FieldSpec::optional("phone", FieldType::Text),
    FieldSpec::optional("hireDate", FieldType::Date),
];

static CLIENT_SCHEMA: EntitySchema = EntitySchema {
    kind: ResourceKind::Client,
    fields: CLIENT_FIELDS,
    default_order: OrderBy::newest_first(),
};

static TASK_SCHEMA: EntitySchema = EntitySchema {
    kind: ResourceKind::Task,
    fields: TASK_FIELDS,
    default_order: OrderBy::newest_first(),
};

// Meetings list in calendar order rather than by creation time.
static MEETING_SCHEMA: EntitySchema = EntitySchema {
    kind: ResourceKind::Meeting,
    fields: MEETING_FIELDS,
    default_order: OrderBy::ascending("datetime"),
};

static ONBOARDING_SCHEMA: EntitySchema = EntitySchema {
    kind: ResourceKind::Onboarding,
    fields: ONBOARDING_FIELDS,
    default_order: OrderBy::newest_first(),
};

static TEAM_MEMBER_SCHEMA: EntitySchema = EntitySchema {
    kind: ResourceKind::TeamMember,
    fields: TEAM_MEMBER_FIELDS,
    default_order: OrderBy::newest_first(),
};

/// Schema for a declared kind.
pub fn schema_for(kind: ResourceKind) -> &'static EntitySchema {
    match kind {
        ResourceKind::Client => &CLIENT_SCHEMA,
        ResourceKind::Task => &TASK_SCHEMA,
        ResourceKind::Meeting => &MEETING_SCHEMA,
        ResourceKind::Onboarding => &ONBOARDING_SCHEMA,
        ResourceKind::TeamMember => &TEAM_MEMBER_SCHEMA,
    }
}

/// Resolves a kind tag to its schema.
///
/// # Errors
/// - `CoreError::UnknownKind` for tags that name no declared kind.
pub fn lookup_schema(tag: &str) -> CoreResult<&'static EntitySchema> {
    parse_kind(tag).map(schema_for)
}

/// Resolves a kind tag, failing with `UnknownKind`.
pub fn parse_kind(tag: &str) -> CoreResult<ResourceKind> {
    ResourceKind::parse(tag).ok_or_else(|| CoreError::UnknownKind(tag.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::{lookup_schema, schema_for, FieldType, SortDirection, SortKey};
    use crate::error::CoreError;
    use crate::model::kind::{ResourceKind, ALL_KINDS};
    use crate::model::status::Status;

    #[test]
    fn unknown_tag_fails_with_unknown_kind() {
        let err = lookup_schema("invoice").unwrap_err();
        assert!(matches!(err, CoreError::UnknownKind(tag) if tag == "invoice"));
    }

    #[test]
    fn status_field_exists_iff_kind_declares_status() {
        for kind in ALL_KINDS {
            let schema = schema_for(kind);
            let status_field = schema
                .fields
                .iter()
                .find(|field| field.field_type == FieldType::Status);
            assert_eq!(status_field.is_some(), schema.has_status(), "{kind}");
            if let Some(field) = status_field {
                let default = field.default.expect("status field carries a default");
                assert_eq!(
                    Status::parse(kind, default).unwrap(),
                    schema.default_status().unwrap()
                );
            }
        }
    }

    #[test]
    fn required_fields_match_data_model() {
        let names = |kind| {
            schema_for(kind)
                .required_fields()
                .map(|field| field.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(ResourceKind::Client), vec!["name"]);
        assert_eq!(names(ResourceKind::Meeting), vec!["title", "datetime"]);
        assert_eq!(names(ResourceKind::Onboarding), vec!["clientName", "startDate"]);
        assert_eq!(names(ResourceKind::TeamMember), vec!["name", "email"]);
    }

    #[test]
    fn meetings_default_to_calendar_order() {
        let order = schema_for(ResourceKind::Meeting).default_order;
        assert_eq!(order.key, SortKey::Field("datetime"));
        assert_eq!(order.direction, SortDirection::Asc);

        let order = lookup_schema("client").unwrap().default_order;
        assert_eq!(order.key, SortKey::CreatedAt);
        assert_eq!(order.direction, SortDirection::Desc);
    }
}
