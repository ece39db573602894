use chrono::{DateTime, Duration, Utc};

use crate::error::DashboardError;
use crate::helpers::human_time;
use crate::models::status::HistoryEntry;
use crate::models::views::{HistoryTimeline, TimelineInterval, TimelineRow};

pub const TIMELINE_LABEL: &str = "Snapshots";
pub const INTERVAL_WIDTH_SECS: i64 = 60;

/// Builds one fixed-width interval per history entry, in input order.
///
/// `EntryTime` is RFC 3339, as written by the collector. A single bad
/// timestamp fails the whole timeline.
pub fn build_timeline(
    entries: &[HistoryEntry],
    now: DateTime<Utc>,
) -> Result<HistoryTimeline, DashboardError> {
    let rows = entries
        .iter()
        .map(|entry| {
            let start = DateTime::parse_from_rfc3339(&entry.entry_time).map_err(|source| {
                DashboardError::MalformedTimestamp {
                    uuid: entry.uuid.clone(),
                    value: entry.entry_time.clone(),
                    source,
                }
            })?;
            Ok(TimelineRow {
                uuid: entry.uuid.clone(),
                taken: human_time(&start, now),
                interval: TimelineInterval {
                    label: TIMELINE_LABEL.to_string(),
                    start,
                    end: start + Duration::seconds(INTERVAL_WIDTH_SECS),
                },
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>()?;

    Ok(HistoryTimeline { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(uuid: &str, time: &str) -> HistoryEntry {
        HistoryEntry {
            uuid: uuid.to_string(),
            entry_time: time.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_one_minute_interval_per_entry() {
        let entries = vec![
            entry("e0", "2017-03-01T10:00:00Z"),
            entry("e1", "2017-03-01T10:02:00Z"),
            entry("e2", "2017-03-01T10:04:30.5+00:00"),
        ];

        let timeline = build_timeline(&entries, now()).unwrap();
        assert_eq!(timeline.len(), 3);

        for (row, e) in timeline.rows.iter().zip(&entries) {
            assert_eq!(row.uuid, e.uuid);
            assert_eq!(row.interval.label, "Snapshots");
            assert_eq!(
                row.interval.start,
                DateTime::parse_from_rfc3339(&e.entry_time).unwrap()
            );
            assert_eq!(row.interval.end - row.interval.start, Duration::seconds(60));
        }
        assert_eq!(timeline.rows[0].taken, "2 hours ago");
    }

    #[test]
    fn test_keeps_input_order() {
        let entries = vec![
            entry("late", "2017-03-01T11:00:00Z"),
            entry("early", "2017-03-01T09:00:00Z"),
        ];
        let timeline = build_timeline(&entries, now()).unwrap();
        let uuids: Vec<&str> = timeline.rows.iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["late", "early"]);
    }

    #[test]
    fn test_empty_history_gives_empty_timeline() {
        let timeline = build_timeline(&[], now()).unwrap();
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_malformed_timestamp_fails_whole_timeline() {
        let entries = vec![
            entry("e0", "2017-03-01T10:00:00Z"),
            entry("e1", "yesterday"),
        ];
        let err = build_timeline(&entries, now()).unwrap_err();
        match err {
            DashboardError::MalformedTimestamp { uuid, value, .. } => {
                assert_eq!(uuid, "e1");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
