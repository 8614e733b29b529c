//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the collaborator contract the repository talks to: filtered and
//!   ordered query, insert, update-by-id, delete-by-id and count.
//! - Keep every statement scoped by the caller's identity.
//!
//! # Invariants
//! - Rows owned by another identity are invisible to every operation.
//! - The store assigns `id` and `created_at`; callers never supply them.

mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;

use crate::db::DbError;
use crate::model::kind::ResourceKind;
use crate::model::record::RecordId;
use crate::model::status::Status;
use crate::schema::OrderBy;
use crate::session::Identity;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport or backend failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted row could not be decoded.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "store failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw row as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: RecordId,
    pub owner: Identity,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Kind-specific field object.
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }
}

/// Typed filter operand; converted to the persisted representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    /// Compared as epoch milliseconds.
    Instant(DateTime<Utc>),
    Status(Status),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl From<Status> for FilterValue {
    fn from(value: Status) -> Self {
        Self::Status(value)
    }
}

impl From<RecordId> for FilterValue {
    fn from(value: RecordId) -> Self {
        Self::Text(value.to_string())
    }
}

/// One predicate on a schema field, `id` or `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Gte, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Lte, value)
    }

    fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Fully resolved query handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub filters: Vec<Filter>,
    pub order: OrderBy,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Field-level replacement applied by `update_by_id`.
pub type StorePatch = Map<String, Value>;

/// Store collaborator contract. Every call is scoped to `owner`.
pub trait RecordStore {
    fn query(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        query: &StoreQuery,
    ) -> StoreResult<Vec<StoredRow>>;

    fn insert(&self, owner: &Identity, kind: ResourceKind, data: &Value) -> StoreResult<StoredRow>;

    /// Returns `None` when `id` is not visible to `owner`.
    fn update_by_id(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        id: RecordId,
        patch: &StorePatch,
    ) -> StoreResult<Option<StoredRow>>;

    /// Returns `false` when `id` is not visible to `owner`.
    fn delete_by_id(&self, owner: &Identity, kind: ResourceKind, id: RecordId)
        -> StoreResult<bool>;

    fn count(&self, owner: &Identity, kind: ResourceKind, filters: &[Filter]) -> StoreResult<u64>;
}
