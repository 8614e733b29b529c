//! Core engine for the operations desk.
//!
//! Owner-scoped records of five kinds (clients, tasks, meetings, onboarding
//! processes, team members) with status workflows and dashboard
//! aggregation. This crate is the single source of truth for record
//! invariants; presentation layers call into it with an explicit session.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;
pub mod session;
pub mod store;
pub mod workflow;

pub use aggregate::{
    count_by_status, dashboard_counts, dashboard_counts_for_tags, percent_complete, upcoming,
    KindCounts, StatusCounts,
};
pub use config::{ConfigError, CoreConfig, ListLimits};
pub use error::{CoreError, CoreResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LogLevel,
    LoggingError,
};
pub use model::kind::ResourceKind;
pub use model::payload::{NewClient, NewMeeting, NewOnboarding, NewRecord, NewTask, NewTeamMember};
pub use model::record::{Record, RecordFields, RecordId};
pub use model::status::{ClientStatus, OnboardingStatus, Status, TaskPriority, TaskStatus};
pub use model::validation::{ValidationError, ValidationReason};
pub use repo::{ListQuery, RecordRepository};
pub use schema::{lookup_schema, parse_kind, schema_for, EntitySchema, OrderBy};
pub use service::{DashboardService, ProgressOverview, ReportSummary};
pub use session::{Identity, IdentityProvider, RequestGate, RequestTicket, SessionContext};
pub use store::{Filter, RecordStore, SqliteRecordStore, StoreError};
pub use workflow::{StatusWorkflow, TransitionPolicy, TransitionTable, Unrestricted};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
