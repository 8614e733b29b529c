//! Pure aggregation over fetched records.
//!
//! # Invariants
//! - No function here touches the store.
//! - Status counts only contain statuses declared for the requested kind.

use crate::model::kind::ResourceKind;
use crate::model::record::Record;
use crate::model::status::Status;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Status -> number of records. Statuses with no records are absent.
pub type StatusCounts = BTreeMap<Status, u64>;

/// Counts `records` of `kind` per status.
///
/// Records of other kinds, and kinds without a status enum, contribute
/// nothing.
pub fn count_by_status(kind: ResourceKind, records: &[Record]) -> StatusCounts {
    let mut counts = StatusCounts::new();
    let Some(declared) = Status::declared(kind) else {
        return counts;
    };
    for status in records
        .iter()
        .filter(|record| record.kind() == kind)
        .filter_map(Record::status)
        .filter(|status| declared.contains(status))
    {
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
}

/// Share of `completed` among all counted records, in percent.
///
/// Returns `0.0` when nothing was counted.
pub fn percent_complete(counts: &StatusCounts, completed: Status) -> f64 {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let done = counts.get(&completed).copied().unwrap_or(0);
    done as f64 / total as f64 * 100.0
}

/// Meetings at or after `from`, earliest first, at most `limit`.
pub fn upcoming(meetings: &[Record], from: DateTime<Utc>, limit: usize) -> Vec<Record> {
    let mut selected: Vec<&Record> = meetings
        .iter()
        .filter(|record| {
            record
                .as_meeting()
                .is_some_and(|meeting| meeting.datetime >= from)
        })
        .collect();
    selected.sort_by_key(|record| record.as_meeting().map(|meeting| meeting.datetime));
    selected.into_iter().take(limit).cloned().collect()
}

/// Rounds to one decimal place, as report views display rates.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{count_by_status, percent_complete, round_one_decimal, upcoming, StatusCounts};
    use crate::model::kind::ResourceKind;
    use crate::model::record::{MeetingFields, Record, RecordFields, TaskFields};
    use crate::model::status::{Status, TaskPriority, TaskStatus};
    use crate::session::Identity;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn record(fields: RecordFields) -> Record {
        Record {
            id: Uuid::new_v4(),
            owner: Identity::new("owner").unwrap(),
            created_at: 0,
            fields,
        }
    }

    fn task(status: TaskStatus) -> Record {
        record(RecordFields::Task(TaskFields {
            title: "t".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            due_date: None,
            status,
        }))
    }

    fn meeting(offset_hours: i64) -> Record {
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        record(RecordFields::Meeting(MeetingFields {
            title: format!("m{offset_hours}"),
            description: None,
            datetime: base + Duration::hours(offset_hours),
            location: None,
            participants: Vec::new(),
        }))
    }

    #[test]
    fn percent_complete_of_mixed_counts() {
        let counts = StatusCounts::from([
            (Status::Task(TaskStatus::Pending), 2),
            (Status::Task(TaskStatus::InProgress), 1),
            (Status::Task(TaskStatus::Done), 3),
        ]);
        assert_eq!(percent_complete(&counts, Status::Task(TaskStatus::Done)), 50.0);
    }

    #[test]
    fn percent_complete_of_empty_counts_is_zero() {
        assert_eq!(
            percent_complete(&StatusCounts::new(), Status::Task(TaskStatus::Done)),
            0.0
        );
    }

    #[test]
    fn count_by_status_omits_zero_buckets_and_other_kinds() {
        let records = vec![
            task(TaskStatus::Pending),
            task(TaskStatus::Pending),
            task(TaskStatus::Done),
            meeting(1),
        ];
        let counts = count_by_status(ResourceKind::Task, &records);
        assert_eq!(
            counts,
            StatusCounts::from([
                (Status::Task(TaskStatus::Pending), 2),
                (Status::Task(TaskStatus::Done), 1),
            ])
        );
        assert!(count_by_status(ResourceKind::Meeting, &records).is_empty());
        assert!(count_by_status(ResourceKind::Client, &records).is_empty());
    }

    #[test]
    fn upcoming_filters_sorts_and_truncates() {
        let meetings: Vec<Record> = [5, -2, 3, 0, 9, 1, 7, -1].into_iter().map(meeting).collect();
        let from = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let selected = upcoming(&meetings, from, 5);

        assert_eq!(selected.len(), 5);
        let times: Vec<_> = selected
            .iter()
            .map(|record| record.as_meeting().unwrap().datetime)
            .collect();
        assert!(times.iter().all(|time| *time >= from));
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(times[0], from);
    }

    #[test]
    fn upcoming_ignores_non_meetings() {
        let records = vec![task(TaskStatus::Pending), meeting(2)];
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(upcoming(&records, from, 5).len(), 1);
        assert!(upcoming(&records, from, 0).is_empty());
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(100.0 / 3.0), 33.3);
        assert_eq!(round_one_decimal(66.66), 66.7);
    }
}
