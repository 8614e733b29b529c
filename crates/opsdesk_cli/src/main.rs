//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `opsdesk_core` linkage.
//! - Exercise the open -> sign-in -> create -> aggregate path end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `opsdesk_cli [config.json]`

use opsdesk_core::db::open_from_config;
use opsdesk_core::{
    init_logging_from_config, CoreConfig, DashboardService, Identity, NewClient, NewTask,
    RecordRepository, SessionContext, SqliteRecordStore, TaskStatus,
};
use std::error::Error;
use std::process::ExitCode;

const DEMO_SUBJECT: &str = "cli-smoke";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("opsdesk_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("opsdesk_core ping={}", opsdesk_core::ping());
    println!("opsdesk_core version={}", opsdesk_core::core_version());

    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let conn = open_from_config(&config)?;
    let store = SqliteRecordStore::try_new(&conn)?;
    let repo = RecordRepository::new(store).with_limits(config.list_limits());

    let identity = Identity::new(DEMO_SUBJECT).ok_or("demo identity is blank")?;
    let session = SessionContext::signed_in(identity);

    repo.create(&session, NewClient::new("Smoke Client").build()?)?;
    repo.create(&session, NewTask::new("Smoke task").build()?)?;
    repo.create(
        &session,
        NewTask::new("Finished smoke task")
            .status(TaskStatus::Done)
            .build()?,
    )?;

    let dashboard = DashboardService::new(&repo).with_upcoming_limit(config.upcoming_limit);
    for (kind, count) in dashboard.overview_counts(&session)? {
        println!("count {kind}={count}");
    }
    let report = dashboard.report_summary(&session)?;
    println!("task completion={}%", report.completion_rate);
    Ok(())
}
