//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into view-level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod dashboard_service;

pub use dashboard_service::{DashboardService, ProgressOverview, ReportSummary};
