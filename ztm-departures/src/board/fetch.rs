//! Per-line fetching: one upstream query per requested line.
//!
//! Failures are contained at two levels. A record whose time cannot be
//! parsed is skipped; a line whose request fails is reported as
//! [`LineResult::Unavailable`] and the other lines carry on.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{
    Line, RawReading, StopRef, TimeFormatError, minutes_until, resolve_departure,
};
use crate::ztm::{RawRecord, ScheduleSource, ZtmError};

/// A reading that has not departed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingReading {
    pub reading: RawReading,

    /// Absolute departure instant.
    pub departs_at: DateTime<Utc>,

    /// Whole minutes from "now", never negative.
    pub minutes_until: i64,
}

/// Outcome of fetching one line.
#[derive(Debug)]
pub enum LineResult {
    /// Upcoming readings, soonest first. May be empty.
    Available(Vec<UpcomingReading>),

    /// The upstream request for this line failed.
    Unavailable(ZtmError),
}

impl LineResult {
    pub fn is_available(&self) -> bool {
        matches!(self, LineResult::Available(_))
    }
}

/// Fold one upstream record into a reading.
///
/// Entries with a `null` value are treated as absent.
pub fn parse_record(record: &RawRecord) -> Result<RawReading, TimeFormatError> {
    RawReading::from_fields(
        record
            .iter()
            .filter_map(|entry| entry.value.as_deref().map(|value| (entry.key.as_str(), value))),
    )
}

/// Turn a line's records into its upcoming readings.
///
/// Records that fail to parse or resolve are dropped, as are departures
/// strictly before `now`. The result is sorted by minutes until departure.
pub fn upcoming_readings(
    records: Vec<RawRecord>,
    now: DateTime<Utc>,
    zone: Tz,
) -> Vec<UpcomingReading> {
    let mut upcoming: Vec<UpcomingReading> = records
        .into_iter()
        .filter_map(|record| match parse_record(&record) {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::warn!(error = %e, fields = ?record, "skipping unparseable reading");
                None
            }
        })
        .filter_map(|reading| {
            let departs_at = resolve_departure(reading.scheduled_time, now, zone)?;
            (departs_at >= now).then(|| UpcomingReading {
                minutes_until: minutes_until(departs_at, now),
                departs_at,
                reading,
            })
        })
        .collect();

    upcoming.sort_by_key(|u| u.minutes_until);
    upcoming
}

/// Fetch and resolve one line's departures at `stop`.
pub async fn fetch_line<S: ScheduleSource>(
    source: &S,
    stop: &StopRef,
    line: Line,
    now: DateTime<Utc>,
    zone: Tz,
) -> LineResult {
    match source.fetch_records(stop, line).await {
        Ok(records) => LineResult::Available(upcoming_readings(records, now, zone)),
        Err(e) => {
            tracing::error!(%stop, %line, error = %e, "cannot fetch timetable");
            LineResult::Unavailable(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ztm::{FieldEntry, MockScheduleSource};
    use chrono::TimeZone;

    fn warsaw() -> Tz {
        "Europe/Warsaw".parse().unwrap()
    }

    fn local(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        warsaw()
            .with_ymd_and_hms(2024, 3, 15, h, m, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn record(direction: &str, time: &str) -> RawRecord {
        vec![
            FieldEntry::new("kierunek", direction),
            FieldEntry::new("czas", time),
        ]
    }

    fn times(upcoming: &[UpcomingReading]) -> Vec<String> {
        upcoming.iter().map(|u| u.reading.display_time()).collect()
    }

    #[test]
    fn null_values_fall_back_to_defaults() {
        let reading = parse_record(&vec![
            FieldEntry {
                key: "kierunek".into(),
                value: None,
            },
            FieldEntry::new("czas", "10:00:00"),
        ])
        .unwrap();
        assert_eq!(reading.direction, "na");
    }

    #[test]
    fn keeps_future_and_sorts() {
        let records = vec![
            record("A", "12:30:00"),
            record("B", "10:05:00"),
            record("C", "11:00:00"),
        ];
        let upcoming = upcoming_readings(records, local(10, 0, 0), warsaw());

        assert_eq!(times(&upcoming), ["10:05", "11:00", "12:30"]);
        assert_eq!(upcoming[0].minutes_until, 5);
        assert_eq!(upcoming[0].reading.direction, "B");
    }

    #[test]
    fn drops_departed() {
        let records = vec![record("A", "09:59:00"), record("B", "10:00:00")];
        let upcoming = upcoming_readings(records, local(10, 0, 0), warsaw());

        // Departing this very minute is still shown.
        assert_eq!(times(&upcoming), ["10:00"]);
        assert_eq!(upcoming[0].minutes_until, 0);
    }

    #[test]
    fn seconds_into_the_minute_count_as_departed() {
        // 10:00 resolves to 10:00:00, which is before 10:00:30.
        let upcoming =
            upcoming_readings(vec![record("A", "10:00:59")], local(10, 0, 30), warsaw());
        assert!(upcoming.is_empty());
    }

    #[test]
    fn malformed_time_skips_only_that_reading() {
        let records = vec![
            record("A", "abc"),
            record("B", "10:30:00"),
            record("C", "10:3:00"),
        ];
        let upcoming = upcoming_readings(records, local(10, 0, 0), warsaw());
        assert_eq!(times(&upcoming), ["10:30"]);
    }

    #[test]
    fn unresolvable_time_is_dropped() {
        let records = vec![record("A", "10:99:00"), record("B", "50:00:00")];
        let upcoming = upcoming_readings(records, local(10, 0, 0), warsaw());
        assert!(upcoming.is_empty());
    }

    #[test]
    fn night_bus_around_midnight() {
        let records = vec![record("Centrum", "24:10:00"), record("Centrum", "23:58:00")];
        let upcoming = upcoming_readings(records, local(23, 55, 0), warsaw());

        assert_eq!(times(&upcoming), ["23:58", "24:10"]);
        assert_eq!(upcoming[0].minutes_until, 3);
        assert_eq!(upcoming[1].minutes_until, 15);
    }

    #[test]
    fn after_midnight_previous_night_entries_are_tomorrow() {
        // At 00:05 a "24:10" entry refers to the coming night, not tonight.
        let now = warsaw()
            .with_ymd_and_hms(2024, 3, 16, 0, 5, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let upcoming = upcoming_readings(vec![record("Centrum", "24:10:00")], now, warsaw());
        assert_eq!(upcoming[0].minutes_until, 24 * 60 + 5);
    }

    #[tokio::test]
    async fn fetch_line_available() {
        let source = MockScheduleSource::new().with_records(
            Line::new(14),
            [
                &[("kierunek", "Centrum"), ("czas", "10:20:00")][..],
                &[("kierunek", "Centrum"), ("czas", "10:10:00")][..],
            ],
        );

        let result = fetch_line(
            &source,
            &StopRef::new(7007, "01"),
            Line::new(14),
            local(10, 0, 0),
            warsaw(),
        )
        .await;

        match result {
            LineResult::Available(upcoming) => assert_eq!(times(&upcoming), ["10:10", "10:20"]),
            LineResult::Unavailable(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[tokio::test]
    async fn fetch_line_null_result_is_empty() {
        let source = MockScheduleSource::new().with_body(Line::new(14), r#"{"result": null}"#);

        let result = fetch_line(
            &source,
            &StopRef::new(7007, "01"),
            Line::new(14),
            local(10, 0, 0),
            warsaw(),
        )
        .await;

        assert!(matches!(result, LineResult::Available(ref v) if v.is_empty()));
    }

    #[tokio::test]
    async fn fetch_line_failure_is_unavailable() {
        let source = MockScheduleSource::new().with_status(Line::new(14), 500);

        let result = fetch_line(
            &source,
            &StopRef::new(7007, "01"),
            Line::new(14),
            local(10, 0, 0),
            warsaw(),
        )
        .await;

        assert!(!result.is_available());
    }
}
