//! Validated create payloads.
//!
//! # Responsibility
//! - Provide one builder per kind that checks required fields at build time.
//! - Decode untyped external JSON through the schema registry (defaults,
//!   required markers, unknown keys) into the same validated payload.
//!
//! # Invariants
//! - A `NewRecord` always passed `RecordFields::validate()`.
//! - Payloads never carry `id`, `owner` or `createdAt`; the store and session
//!   supply those.

use crate::model::kind::ResourceKind;
use crate::model::record::{
    ClientFields, MeetingFields, OnboardingFields, RecordFields, TaskFields, TeamMemberFields,
};
use crate::model::status::{ClientStatus, OnboardingStatus, Status, TaskPriority, TaskStatus};
use crate::model::validation::{
    check_email, optional_text, parse_date, parse_instant, require_text, ValidationError,
};
use crate::schema::{schema_for, FieldSpec, FieldType};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

/// Create payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord(RecordFields);

impl NewRecord {
    /// Normalizes and validates a field set into a payload.
    pub fn from_fields(fields: RecordFields) -> Result<Self, ValidationError> {
        let fields = fields.normalized();
        fields.validate()?;
        Ok(Self(fields))
    }

    /// Decodes external JSON for `kind` using the kind's schema.
    ///
    /// # Errors
    /// - `Missing` for absent or blank required fields.
    /// - `Invalid` for malformed dates, instants, emails or enum values.
    /// - `Unknown` for keys the schema does not declare.
    pub fn from_json(kind: ResourceKind, payload: &Value) -> Result<Self, ValidationError> {
        let object = payload
            .as_object()
            .ok_or_else(|| ValidationError::invalid("$", "payload must be a JSON object"))?;
        let schema = schema_for(kind);

        if let Some(key) = object.keys().find(|key| schema.field(key).is_none()) {
            return Err(ValidationError::unknown(key.as_str()));
        }

        let mut normalized = Map::new();
        for spec in schema.fields {
            let raw = object.get(spec.name).filter(|value| !is_blank(value));
            let value = match (raw, spec.default) {
                (Some(value), _) => normalize_value(kind, spec, value)?,
                (None, Some(default)) => {
                    normalize_value(kind, spec, &Value::String(default.to_string()))?
                }
                (None, None) if spec.required => return Err(ValidationError::missing(spec.name)),
                (None, None) => continue,
            };
            normalized.insert(spec.name.to_string(), value);
        }

        let fields = RecordFields::from_json(kind, Value::Object(normalized))
            .map_err(|err| ValidationError::invalid("$", err.to_string()))?;
        Self::from_fields(fields)
    }

    pub fn kind(&self) -> ResourceKind {
        self.0.kind()
    }

    pub fn fields(&self) -> &RecordFields {
        &self.0
    }

    pub fn into_fields(self) -> RecordFields {
        self.0
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn expect_str<'a>(spec: &FieldSpec, value: &'a Value) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::invalid(spec.name, "expected a string"))
}

fn normalize_value(
    kind: ResourceKind,
    spec: &FieldSpec,
    value: &Value,
) -> Result<Value, ValidationError> {
    match spec.field_type {
        FieldType::Text => Ok(Value::String(expect_str(spec, value)?.trim().to_string())),
        FieldType::Email => {
            let email = expect_str(spec, value)?.trim();
            check_email(spec.name, email)?;
            Ok(Value::String(email.to_string()))
        }
        FieldType::Date => {
            let date = parse_date(spec.name, expect_str(spec, value)?)?;
            Ok(Value::String(date.format("%Y-%m-%d").to_string()))
        }
        FieldType::DateTime => {
            let instant = match value {
                Value::Number(number) => number
                    .as_i64()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .ok_or_else(|| ValidationError::invalid(spec.name, "epoch millis out of range"))?,
                other => parse_instant(spec.name, expect_str(spec, other)?)?,
            };
            Ok(Value::from(instant.timestamp_millis()))
        }
        FieldType::Choice(allowed) => {
            let choice = expect_str(spec, value)?.trim();
            if !allowed.contains(&choice) {
                return Err(ValidationError::invalid(
                    spec.name,
                    format!("`{choice}` is not one of {}", allowed.join("|")),
                ));
            }
            Ok(Value::String(choice.to_string()))
        }
        FieldType::Status => {
            let status = Status::parse(kind, expect_str(spec, value)?)
                .map_err(|err| ValidationError::invalid(spec.name, err.to_string()))?;
            Ok(Value::String(status.as_str().to_string()))
        }
        FieldType::TextList => {
            let items: Vec<String> = match value {
                Value::String(text) => split_names(text),
                Value::Array(items) => {
                    let mut names = Vec::with_capacity(items.len());
                    for item in items {
                        if let Some(name) = optional_text(Some(expect_str(spec, item)?)) {
                            names.push(name);
                        }
                    }
                    names
                }
                _ => {
                    return Err(ValidationError::invalid(
                        spec.name,
                        "expected a list of names",
                    ))
                }
            };
            Ok(Value::from(items))
        }
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|part| optional_text(Some(part)))
        .collect()
}

/// Builder for client payloads.
#[derive(Debug, Clone)]
pub struct NewClient {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    status: ClientStatus,
}

impl NewClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            status: ClientStatus::Active,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<NewRecord, ValidationError> {
        NewRecord::from_fields(RecordFields::Client(ClientFields {
            name: require_text("name", &self.name)?,
            email: optional_text(self.email.as_deref()),
            phone: optional_text(self.phone.as_deref()),
            company: optional_text(self.company.as_deref()),
            status: self.status,
        }))
    }
}

/// Builder for task payloads. Defaults: priority `medium`, status `pending`.
#[derive(Debug, Clone)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    status: TaskStatus,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
            status: TaskStatus::Pending,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<NewRecord, ValidationError> {
        NewRecord::from_fields(RecordFields::Task(TaskFields {
            title: require_text("title", &self.title)?,
            description: optional_text(self.description.as_deref()),
            priority: self.priority,
            due_date: self.due_date,
            status: self.status,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct NewMeeting {
    title: String,
    description: Option<String>,
    datetime: DateTime<Utc>,
    location: Option<String>,
    participants: Vec<String>,
}

impl NewMeeting {
    pub fn new(title: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            datetime,
            location: None,
            participants: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn participant(mut self, participant: impl Into<String>) -> Self {
        self.participants.push(participant.into());
        self
    }

    pub fn build(self) -> Result<NewRecord, ValidationError> {
        NewRecord::from_fields(RecordFields::Meeting(MeetingFields {
            title: require_text("title", &self.title)?,
            description: optional_text(self.description.as_deref()),
            datetime: self.datetime,
            location: optional_text(self.location.as_deref()),
            participants: self
                .participants
                .iter()
                .filter_map(|name| optional_text(Some(name)))
                .collect(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct NewOnboarding {
    client_name: String,
    start_date: NaiveDate,
    current_stage: Option<String>,
    notes: Option<String>,
    status: OnboardingStatus,
}

impl NewOnboarding {
    pub fn new(client_name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            client_name: client_name.into(),
            start_date,
            current_stage: None,
            notes: None,
            status: OnboardingStatus::InProgress,
        }
    }

    pub fn current_stage(mut self, stage: impl Into<String>) -> Self {
        self.current_stage = Some(stage.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn status(mut self, status: OnboardingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<NewRecord, ValidationError> {
        NewRecord::from_fields(RecordFields::Onboarding(OnboardingFields {
            client_name: require_text("clientName", &self.client_name)?,
            start_date: self.start_date,
            current_stage: optional_text(self.current_stage.as_deref()),
            notes: optional_text(self.notes.as_deref()),
            status: self.status,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    name: String,
    email: String,
    role: Option<String>,
    department: Option<String>,
    phone: Option<String>,
    hire_date: Option<NaiveDate>,
}

impl NewTeamMember {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: None,
            department: None,
            phone: None,
            hire_date: None,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn hire_date(mut self, hire_date: NaiveDate) -> Self {
        self.hire_date = Some(hire_date);
        self
    }

    pub fn build(self) -> Result<NewRecord, ValidationError> {
        NewRecord::from_fields(RecordFields::TeamMember(TeamMemberFields {
            name: require_text("name", &self.name)?,
            email: require_text("email", &self.email)?,
            role: optional_text(self.role.as_deref()),
            department: optional_text(self.department.as_deref()),
            phone: optional_text(self.phone.as_deref()),
            hire_date: self.hire_date,
        }))
    }
}
