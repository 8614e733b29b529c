//! Dashboard, follow-up and report views.
//!
//! # Responsibility
//! - Compose repository reads with pure aggregation into view models.
//!
//! # Invariants
//! - Every view requires a signed-in session.
//! - Views issue independent per-kind queries; results may reflect
//!   different instants for different kinds.

use crate::aggregate::{
    count_by_status, dashboard_counts, percent_complete, round_one_decimal, upcoming,
    KindCounts, StatusCounts,
};
use crate::error::CoreResult;
use crate::model::kind::{ResourceKind, ALL_KINDS};
use crate::model::record::Record;
use crate::model::status::{OnboardingStatus, Status, TaskStatus};
use crate::repo::{ListQuery, RecordRepository};
use crate::schema::OrderBy;
use crate::session::SessionContext;
use crate::store::{Filter, RecordStore};
use crate::workflow::TransitionPolicy;
use chrono::{DateTime, Utc};

const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Follow-up view: task progress, active onboardings, next meetings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub task_counts: StatusCounts,
    /// Percent of tasks `done`, unrounded.
    pub task_completion: f64,
    /// Onboardings currently `in_progress`.
    pub active_onboardings: u64,
    /// Earliest first.
    pub upcoming_meetings: Vec<Record>,
}

/// Report view: status distributions and totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub task_counts: StatusCounts,
    pub client_counts: StatusCounts,
    pub total_tasks: u64,
    pub total_clients: u64,
    /// Percent of tasks `done`, rounded to one decimal.
    pub completion_rate: f64,
}

/// View service over a record repository.
pub struct DashboardService<'repo, S: RecordStore, P: TransitionPolicy> {
    repo: &'repo RecordRepository<S, P>,
    upcoming_limit: usize,
}

impl<'repo, S: RecordStore, P: TransitionPolicy> DashboardService<'repo, S, P> {
    pub fn new(repo: &'repo RecordRepository<S, P>) -> Self {
        Self {
            repo,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }

    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }

    /// Record totals for every kind.
    pub fn overview_counts(&self, session: &SessionContext) -> CoreResult<KindCounts> {
        dashboard_counts(self.repo, session, &ALL_KINDS)
    }

    pub fn progress_overview(
        &self,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> CoreResult<ProgressOverview> {
        let tasks = self.repo.list_all(session, ResourceKind::Task, &[])?;
        let task_counts = count_by_status(ResourceKind::Task, &tasks);
        let task_completion = percent_complete(&task_counts, Status::Task(TaskStatus::Done));

        let active_onboardings = self.repo.count(
            session,
            ResourceKind::Onboarding,
            &[Filter::eq(
                "status",
                Status::Onboarding(OnboardingStatus::InProgress),
            )],
        )?;

        let limit = u32::try_from(self.upcoming_limit).unwrap_or(u32::MAX);
        let query = ListQuery::new()
            .filter(Filter::gte("datetime", now))
            .order(OrderBy::ascending("datetime"))
            .limit(limit);
        let candidates = self.repo.list(session, ResourceKind::Meeting, &query)?;
        let upcoming_meetings = upcoming(&candidates, now, self.upcoming_limit);

        Ok(ProgressOverview {
            task_counts,
            task_completion,
            active_onboardings,
            upcoming_meetings,
        })
    }

    pub fn report_summary(&self, session: &SessionContext) -> CoreResult<ReportSummary> {
        let tasks = self.repo.list_all(session, ResourceKind::Task, &[])?;
        let clients = self.repo.list_all(session, ResourceKind::Client, &[])?;
        let task_counts = count_by_status(ResourceKind::Task, &tasks);
        let client_counts = count_by_status(ResourceKind::Client, &clients);

        Ok(ReportSummary {
            total_tasks: task_counts.values().sum(),
            total_clients: client_counts.values().sum(),
            completion_rate: round_one_decimal(percent_complete(
                &task_counts,
                Status::Task(TaskStatus::Done),
            )),
            task_counts,
            client_counts,
        })
    }
}
