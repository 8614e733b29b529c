//! Count-only dashboard aggregation.
//!
//! # Invariants
//! - One count query per kind; no rows are materialized.
//! - No cross-kind consistency: each kind is counted independently.

use crate::error::CoreResult;
use crate::model::kind::ResourceKind;
use crate::repo::RecordRepository;
use crate::schema::parse_kind;
use crate::session::SessionContext;
use crate::store::RecordStore;
use crate::workflow::TransitionPolicy;
use log::info;
use std::collections::BTreeMap;

pub type KindCounts = BTreeMap<ResourceKind, u64>;

/// Total record count per kind in the caller's scope.
pub fn dashboard_counts<S: RecordStore, P: TransitionPolicy>(
    repo: &RecordRepository<S, P>,
    session: &SessionContext,
    kinds: &[ResourceKind],
) -> CoreResult<KindCounts> {
    session.require_identity()?;
    let mut counts = KindCounts::new();
    for &kind in kinds {
        counts.insert(kind, repo.count(session, kind, &[])?);
    }
    info!(
        "event=dashboard_counts module=aggregate status=ok kinds={}",
        counts.len()
    );
    Ok(counts)
}

/// Same as `dashboard_counts`, resolving external kind tags first.
///
/// # Errors
/// - `UnknownKind` for any undeclared tag; no counts are issued then.
pub fn dashboard_counts_for_tags<S: RecordStore, P: TransitionPolicy>(
    repo: &RecordRepository<S, P>,
    session: &SessionContext,
    tags: &[&str],
) -> CoreResult<KindCounts> {
    let kinds = tags
        .iter()
        .map(|tag| parse_kind(tag))
        .collect::<CoreResult<Vec<_>>>()?;
    dashboard_counts(repo, session, &kinds)
}
