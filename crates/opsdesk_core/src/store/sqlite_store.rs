//! SQLite-backed record store.
//!
//! # Responsibility
//! - Implement `RecordStore` over the single `records` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every statement carries `owner = ? AND kind = ?`.
//! - Field paths and values are always bound, never interpolated.
//! - Read paths reject undecodable rows instead of masking them.

use super::{
    Filter, FilterValue, RecordStore, StoreError, StorePatch, StoreQuery, StoreResult, StoredRow,
};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::kind::ResourceKind;
use crate::model::record::RecordId;
use crate::schema::{SortDirection, SortKey};
use crate::session::Identity;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::Value;
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT id, owner, data, created_at FROM records";
const ID_COLUMN: &str = "id";

pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection after checking it is fully migrated.
    ///
    /// # Errors
    /// - `DbError::NotMigrated` when the schema version differs from this
    ///   binary's latest migration.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let db_version = current_user_version(conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(StoreError::Db(DbError::NotMigrated {
                db_version,
                expected,
            }));
        }
        Ok(Self { conn })
    }

    fn get_row(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        id: RecordId,
    ) -> StoreResult<Option<StoredRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL} WHERE owner = ?1 AND kind = ?2 AND id = ?3;"
        ))?;
        let mut rows = stmt.query(params![owner.as_str(), kind.as_str(), id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_row(row)?)),
            None => Ok(None),
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn query(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        query: &StoreQuery,
    ) -> StoreResult<Vec<StoredRow>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE owner = ? AND kind = ?");
        let mut bind_values = scope_values(owner, kind);
        push_filters(&mut sql, &mut bind_values, &query.filters);

        let direction = match query.order.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        match query.order.key {
            SortKey::CreatedAt => {
                sql.push_str(&format!(" ORDER BY created_at {direction}, seq {direction}"));
            }
            SortKey::Field(field) => {
                sql.push_str(&format!(
                    " ORDER BY json_extract(data, ?) {direction}, seq {direction}"
                ));
                bind_values.push(SqlValue::Text(json_path(field)));
            }
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(SqlValue::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(SqlValue::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(SqlValue::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_row(row)?);
        }
        Ok(records)
    }

    fn insert(&self, owner: &Identity, kind: ResourceKind, data: &Value) -> StoreResult<StoredRow> {
        if !data.is_object() {
            return Err(StoreError::InvalidData(
                "record data must be a JSON object".to_string(),
            ));
        }

        let row = StoredRow {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            created_at: Utc::now().timestamp_millis(),
            data: data.clone(),
        };
        self.conn.execute(
            "INSERT INTO records (id, kind, owner, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                row.id.to_string(),
                kind.as_str(),
                owner.as_str(),
                data.to_string(),
                row.created_at,
            ],
        )?;
        Ok(row)
    }

    fn update_by_id(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        id: RecordId,
        patch: &StorePatch,
    ) -> StoreResult<Option<StoredRow>> {
        if patch.is_empty() {
            return self.get_row(owner, kind, id);
        }

        let mut assignments = Vec::with_capacity(patch.len());
        let mut bind_values = Vec::with_capacity(patch.len() * 2 + 3);
        for (field, value) in patch {
            assignments.push("?, json(?)");
            bind_values.push(SqlValue::Text(json_path(field)));
            bind_values.push(SqlValue::Text(value.to_string()));
        }
        let sql = format!(
            "UPDATE records SET data = json_set(data, {})
             WHERE owner = ? AND kind = ? AND id = ?;",
            assignments.join(", ")
        );
        bind_values.extend(scope_values(owner, kind));
        bind_values.push(SqlValue::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_row(owner, kind, id)
    }

    fn delete_by_id(
        &self,
        owner: &Identity,
        kind: ResourceKind,
        id: RecordId,
    ) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM records WHERE owner = ?1 AND kind = ?2 AND id = ?3;",
            params![owner.as_str(), kind.as_str(), id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn count(&self, owner: &Identity, kind: ResourceKind, filters: &[Filter]) -> StoreResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM records WHERE owner = ? AND kind = ?");
        let mut bind_values = scope_values(owner, kind);
        push_filters(&mut sql, &mut bind_values, filters);

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative row count {count}")))
    }
}

fn scope_values(owner: &Identity, kind: ResourceKind) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(owner.as_str().to_string()),
        SqlValue::Text(kind.as_str().to_string()),
    ]
}

fn push_filters(sql: &mut String, bind_values: &mut Vec<SqlValue>, filters: &[Filter]) {
    for filter in filters {
        let op = filter.op.sql();
        if filter.field == ID_COLUMN {
            sql.push_str(&format!(" AND id {op} ?"));
        } else {
            sql.push_str(&format!(" AND json_extract(data, ?) {op} ?"));
            bind_values.push(SqlValue::Text(json_path(&filter.field)));
        }
        bind_values.push(filter_value_to_sql(&filter.value));
    }
}

fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

fn filter_value_to_sql(value: &FilterValue) -> SqlValue {
    match value {
        FilterValue::Text(text) => SqlValue::Text(text.clone()),
        FilterValue::Integer(number) => SqlValue::Integer(*number),
        FilterValue::Date(date) => SqlValue::Text(date.format("%Y-%m-%d").to_string()),
        FilterValue::Instant(instant) => SqlValue::Integer(instant.timestamp_millis()),
        FilterValue::Status(status) => SqlValue::Text(status.as_str().to_string()),
    }
}

fn parse_row(row: &Row<'_>) -> StoreResult<StoredRow> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in records.id"))
    })?;

    let owner_text: String = row.get("owner")?;
    let owner = Identity::new(owner_text)
        .ok_or_else(|| StoreError::InvalidData(format!("blank owner for record {id}")))?;

    let data_text: String = row.get("data")?;
    let data: Value = serde_json::from_str(&data_text).map_err(|err| {
        StoreError::InvalidData(format!("undecodable data for record {id}: {err}"))
    })?;

    Ok(StoredRow {
        id,
        owner,
        created_at: row.get("created_at")?,
        data,
    })
}
