//! Aggregation engine.
//!
//! # Responsibility
//! - Derive counts, percentages and time-windowed selections for dashboard
//!   and report views.
//!
//! # See also
//! - `service::dashboard_service` for the composed views.

pub mod counts;
pub mod stats;

pub use counts::{dashboard_counts, dashboard_counts_for_tags, KindCounts};
pub use stats::{count_by_status, percent_complete, round_one_decimal, upcoming, StatusCounts};
