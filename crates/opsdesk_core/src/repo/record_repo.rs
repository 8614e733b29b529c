//! Generic, session-scoped record repository.
//!
//! # Responsibility
//! - Provide list/get/create/update-status/delete/count for every kind via
//!   one schema-driven implementation.
//! - Gate each call on the session identity and scope it to that owner.
//! - Turn store rows into typed records, rejecting invalid persisted state.
//!
//! # Invariants
//! - No store call is issued without a signed-in identity.
//! - `owner` is injected from the session on create and never patched.
//! - Delete is permanent; deleting an invisible or already-deleted id fails
//!   `NotFound`.
//! - Concurrent status updates are last-write-wins; there is no revision
//!   check.

use crate::config::ListLimits;
use crate::error::{CoreError, CoreResult};
use crate::model::kind::ResourceKind;
use crate::model::payload::NewRecord;
use crate::model::record::{Record, RecordFields, RecordId};
use crate::model::status::Status;
use crate::model::validation::ValidationError;
use crate::schema::{schema_for, EntitySchema, OrderBy, SortKey};
use crate::session::{Identity, SessionContext};
use crate::store::{Filter, RecordStore, StoreError, StoreQuery, StoredRow};
use crate::workflow::{StatusWorkflow, TransitionPolicy, Unrestricted};
use log::{debug, error, info};
use serde_json::Value;
use std::time::Instant;

const ID_FIELD: &str = "id";

/// Caller-facing list options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    /// `None` selects the kind's default order.
    pub order: Option<OrderBy>,
    /// `None` selects the configured default limit.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Record repository over any `RecordStore`.
pub struct RecordRepository<S: RecordStore, P: TransitionPolicy = Unrestricted> {
    store: S,
    workflow: StatusWorkflow<P>,
    limits: ListLimits,
}

impl<S: RecordStore> RecordRepository<S> {
    /// Repository with the unrestricted status workflow and default limits.
    pub fn new(store: S) -> Self {
        Self {
            store,
            workflow: StatusWorkflow::unrestricted(),
            limits: ListLimits::default(),
        }
    }
}

impl<S: RecordStore, P: TransitionPolicy> RecordRepository<S, P> {
    pub fn with_policy(store: S, policy: P) -> Self {
        Self {
            store,
            workflow: StatusWorkflow::with_policy(policy),
            limits: ListLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ListLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    /// Lists the caller's records of `kind`.
    ///
    /// # Errors
    /// - `AccessDenied` without a session identity.
    /// - `Validation` when a filter or order names an undeclared field.
    /// - `Store` on transport failure.
    pub fn list(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> CoreResult<Vec<Record>> {
        let limit = Some(self.limits.normalize(query.limit));
        self.list_with_limit(session, kind, query, limit)
    }

    /// Lists every matching record without the list limit. Used by
    /// aggregation views that need the full set.
    pub fn list_all(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        filters: &[Filter],
    ) -> CoreResult<Vec<Record>> {
        let query = ListQuery {
            filters: filters.to_vec(),
            ..ListQuery::default()
        };
        self.list_with_limit(session, kind, &query, None)
    }

    fn list_with_limit(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        query: &ListQuery,
        limit: Option<u32>,
    ) -> CoreResult<Vec<Record>> {
        let started_at = Instant::now();
        let owner = session.require_identity()?;
        let schema = schema_for(kind);
        validate_filters(schema, &query.filters)?;
        let order = match query.order {
            Some(order) => validate_order(schema, order)?,
            None => schema.default_order,
        };

        let store_query = StoreQuery {
            filters: query.filters.clone(),
            order,
            limit,
            offset: query.offset,
        };
        let result: CoreResult<Vec<Record>> = self
            .store
            .query(owner, kind, &store_query)
            .map_err(CoreError::from)
            .and_then(|rows| rows.into_iter().map(|row| record_from_row(kind, row)).collect());

        match &result {
            Ok(records) => debug!(
                "event=record_list module=repo status=ok kind={} rows={} duration_ms={}",
                kind,
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("record_list", kind, err),
        }
        result
    }

    /// Fetches one visible record.
    pub fn get(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        id: RecordId,
    ) -> CoreResult<Record> {
        let owner = session.require_identity()?;
        self.find_visible(owner, kind, id)?
            .ok_or(CoreError::NotFound { kind, id })
    }

    /// Persists a validated payload owned by the session identity.
    pub fn create(&self, session: &SessionContext, payload: NewRecord) -> CoreResult<Record> {
        let owner = session.require_identity()?;
        let kind = payload.kind();
        let data = payload
            .fields()
            .to_json()
            .map_err(|err| StoreError::InvalidData(format!("unencodable {kind} payload: {err}")))?;

        let result = self
            .store
            .insert(owner, kind, &data)
            .map_err(CoreError::from)
            .and_then(|row| record_from_row(kind, row));

        match &result {
            Ok(record) => info!(
                "event=record_create module=repo status=ok kind={} id={}",
                kind, record.id
            ),
            Err(err) => log_failure("record_create", kind, err),
        }
        result
    }

    /// Validates untyped external input through the schema, then creates.
    pub fn create_from_json(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        payload: &Value,
    ) -> CoreResult<Record> {
        session.require_identity()?;
        let payload = NewRecord::from_json(kind, payload)?;
        self.create(session, payload)
    }

    /// Applies a status change requested as an external string.
    ///
    /// # Errors
    /// - `AccessDenied` without a session identity.
    /// - `UnsupportedOperation` for kinds without a status enum.
    /// - `InvalidTransition` for undeclared statuses or policy-denied changes;
    ///   the stored record is left unchanged.
    /// - `NotFound` when `id` is not visible to the caller.
    pub fn update_status(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        id: RecordId,
        new_status: &str,
    ) -> CoreResult<Record> {
        session.require_identity()?;
        self.workflow.ensure_supported(kind)?;
        let target = self.workflow.parse_target(kind, new_status)?;
        self.transition(session, kind, id, target)
    }

    /// Applies a typed status change.
    pub fn transition(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        id: RecordId,
        target: Status,
    ) -> CoreResult<Record> {
        let owner = session.require_identity()?;
        self.workflow.ensure_supported(kind)?;

        let current = self
            .find_visible(owner, kind, id)?
            .ok_or(CoreError::NotFound { kind, id })?;
        if let Some(from) = current.status() {
            self.workflow.check(kind, from, target)?;
        }

        let patch = self.workflow.patch_for(target);
        let result = self
            .store
            .update_by_id(owner, kind, id, &patch)
            .map_err(CoreError::from)
            .and_then(|row| row.ok_or(CoreError::NotFound { kind, id }))
            .and_then(|row| record_from_row(kind, row));

        match &result {
            Ok(_) => info!(
                "event=record_status_update module=repo status=ok kind={} id={} to={}",
                kind, id, target
            ),
            Err(err) => log_failure("record_status_update", kind, err),
        }
        result
    }

    /// Permanently removes one visible record.
    pub fn delete(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        id: RecordId,
    ) -> CoreResult<()> {
        let owner = session.require_identity()?;
        let result = match self.store.delete_by_id(owner, kind, id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::NotFound { kind, id }),
            Err(err) => Err(CoreError::from(err)),
        };

        match &result {
            Ok(()) => info!(
                "event=record_delete module=repo status=ok kind={} id={}",
                kind, id
            ),
            Err(err) => log_failure("record_delete", kind, err),
        }
        result
    }

    /// Counts the caller's records without materializing rows.
    pub fn count(
        &self,
        session: &SessionContext,
        kind: ResourceKind,
        filters: &[Filter],
    ) -> CoreResult<u64> {
        let owner = session.require_identity()?;
        validate_filters(schema_for(kind), filters)?;
        let result = self.store.count(owner, kind, filters).map_err(CoreError::from);
        if let Err(err) = &result {
            log_failure("record_count", kind, err);
        }
        result
    }

    fn find_visible(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        id: RecordId,
    ) -> CoreResult<Option<Record>> {
        let query = StoreQuery {
            filters: vec![Filter::eq(ID_FIELD, id)],
            order: OrderBy::newest_first(),
            limit: Some(1),
            offset: 0,
        };
        let row = self.store.query(owner, kind, &query)?.into_iter().next();
        row.map(|row| record_from_row(kind, row)).transpose()
    }
}

fn validate_filters(schema: &EntitySchema, filters: &[Filter]) -> Result<(), ValidationError> {
    for filter in filters {
        if filter.field != ID_FIELD && schema.field(&filter.field).is_none() {
            return Err(ValidationError::unknown(filter.field.as_str()));
        }
    }
    Ok(())
}

fn validate_order(schema: &EntitySchema, order: OrderBy) -> Result<OrderBy, ValidationError> {
    match order.key {
        SortKey::CreatedAt => Ok(order),
        SortKey::Field(field) if schema.field(field).is_some() => Ok(order),
        SortKey::Field(field) => Err(ValidationError::unknown(field)),
    }
}

fn record_from_row(kind: ResourceKind, row: StoredRow) -> CoreResult<Record> {
    let id = row.id;
    let fields = RecordFields::from_json(kind, row.data).map_err(|err| {
        StoreError::InvalidData(format!("undecodable {kind} record {id}: {err}"))
    })?;
    fields.validate().map_err(|err| {
        StoreError::InvalidData(format!("persisted {kind} record {id} is invalid: {err}"))
    })?;
    Ok(Record {
        id,
        owner: row.owner,
        created_at: row.created_at,
        fields,
    })
}

fn log_failure(event: &str, kind: ResourceKind, err: &CoreError) {
    match err {
        CoreError::Store(_) => error!(
            "event={} module=repo status=error kind={} error_code={} error={}",
            event,
            kind,
            err.code(),
            err
        ),
        _ => info!(
            "event={} module=repo status=rejected kind={} error_code={}",
            event,
            kind,
            err.code()
        ),
    }
}
