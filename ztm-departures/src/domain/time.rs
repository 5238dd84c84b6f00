//! Timetable time handling for the ZTM feed.
//!
//! The feed gives departure times as "HH:MM:SS" strings without a date.
//! Trips that leave after local midnight but belong to the previous
//! service day are written with hours of 24 and above ("24:10:00" is
//! ten past midnight tomorrow). This module validates those strings and
//! resolves them against "now" into absolute instants.

use std::fmt;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Error returned when a scheduled time is not in `HH:MM:SS` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid scheduled time {value:?}: {reason}")]
pub struct TimeFormatError {
    value: String,
    reason: &'static str,
}

impl TimeFormatError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

/// A timetable time as published by the feed.
///
/// Only the shape is validated: two digits, colon, two digits, colon,
/// two digits. The hour may legitimately exceed 23 for night buses.
/// Whether the time actually exists on a clock is decided later by
/// [`resolve_departure`].
///
/// # Examples
///
/// ```
/// use ztm_departures::domain::ScheduledTime;
///
/// let t = ScheduledTime::parse("24:10:00").unwrap();
/// assert_eq!(t.hour(), 24);
/// assert!(t.is_night_bus());
/// assert_eq!(t.display_hhmm(), "24:10");
///
/// assert!(ScheduledTime::parse("abc").is_err());
/// assert!(ScheduledTime::parse("7:10:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledTime {
    hour: u32,
    minute: u32,
    second: u32,
}

impl ScheduledTime {
    /// Parse a time in `HH:MM:SS` format.
    pub fn parse(s: &str) -> Result<Self, TimeFormatError> {
        let bytes = s.as_bytes();

        if bytes.len() != 8 {
            return Err(TimeFormatError::new(s, "expected HH:MM:SS format"));
        }

        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeFormatError::new(s, "expected colons at positions 2 and 5"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| TimeFormatError::new(s, "invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeFormatError::new(s, "invalid minute digits"))?;
        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeFormatError::new(s, "invalid second digits"))?;

        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Hour as published, 0-99.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    /// Whether this entry runs after midnight on the following day.
    pub fn is_night_bus(&self) -> bool {
        self.hour >= 24
    }

    /// The `HH:MM` prefix shown to riders, as published (may read "24:10").
    pub fn display_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl fmt::Debug for ScheduledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduledTime({self})")
    }
}

impl fmt::Display for ScheduledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour, self.minute, self.second
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Resolve a scheduled time into an absolute instant.
///
/// The calendar date is taken from `now` as seen in `zone`. Night-bus
/// entries (hour >= 24) move to the next date with the hour reduced by 24.
/// Seconds are ignored.
///
/// Returns `None` when the wall-clock time does not exist: minutes above
/// 59, hours of 48 and above, or a local time skipped by a DST jump. For
/// wall-clock times repeated by a DST fall-back, the earlier instant wins.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ztm_departures::domain::{ScheduledTime, resolve_departure};
///
/// let zone: chrono_tz::Tz = "Europe/Warsaw".parse().unwrap();
/// // 23:55 local on 15 March (UTC+1)
/// let now = Utc.with_ymd_and_hms(2024, 3, 15, 22, 55, 0).unwrap();
///
/// let late = ScheduledTime::parse("24:10:00").unwrap();
/// let dt = resolve_departure(late, now, zone).unwrap();
/// assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 23, 10, 0).unwrap());
/// ```
pub fn resolve_departure(time: ScheduledTime, now: DateTime<Utc>, zone: Tz) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&zone).date_naive();

    let (date, hour) = if time.is_night_bus() {
        (today.succ_opt()?, time.hour() - 24)
    } else {
        (today, time.hour())
    };

    let wall_clock = NaiveTime::from_hms_opt(hour, time.minute(), 0)?;
    let local = zone.from_local_datetime(&date.and_time(wall_clock)).earliest()?;

    Some(local.with_timezone(&Utc))
}

/// Whole minutes from `now` until `departs_at`, rounded down.
///
/// Negative when the departure is already in the past.
pub fn minutes_until(departs_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (departs_at - now).num_seconds().div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    fn warsaw() -> Tz {
        "Europe/Warsaw".parse().unwrap()
    }

    /// A UTC instant given as Warsaw local wall-clock time.
    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        warsaw()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn time(s: &str) -> ScheduledTime {
        ScheduledTime::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = time("00:00:00");
        assert_eq!((t.hour(), t.minute(), t.second()), (0, 0, 0));

        let t = time("23:59:59");
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 59, 59));

        let t = time("29:05:00");
        assert_eq!(t.hour(), 29);
        assert!(t.is_night_bus());
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ScheduledTime::parse("").is_err());
        assert!(ScheduledTime::parse("abc").is_err());
        assert!(ScheduledTime::parse("12:30").is_err());
        assert!(ScheduledTime::parse("1:30:00").is_err());
        assert!(ScheduledTime::parse("12-30-00").is_err());
        assert!(ScheduledTime::parse("12:3a:00").is_err());
        assert!(ScheduledTime::parse("12:30:00 ").is_err());
        assert!(ScheduledTime::parse("+1:30:00").is_err());
    }

    #[test]
    fn shape_only_validation_keeps_odd_minutes() {
        // Accepted by the parser, rejected at resolution time.
        let t = time("12:99:00");
        assert_eq!(t.minute(), 99);
        assert_eq!(resolve_departure(t, local(2024, 3, 15, 10, 0), warsaw()), None);
    }

    #[test]
    fn error_display() {
        let err = ScheduledTime::parse("abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid scheduled time \"abc\": expected HH:MM:SS format"
        );
    }

    #[test]
    fn display_format() {
        assert_eq!(time("07:05:30").to_string(), "07:05:30");
        assert_eq!(time("07:05:30").display_hhmm(), "07:05");
        assert_eq!(time("25:40:00").display_hhmm(), "25:40");
        assert_eq!(format!("{:?}", time("07:05:30")), "ScheduledTime(07:05:30)");
    }

    #[test]
    fn day_time_resolves_same_date() {
        let now = local(2024, 3, 15, 10, 0);
        let dt = resolve_departure(time("14:30:45"), now, warsaw()).unwrap();
        assert_eq!(dt, local(2024, 3, 15, 14, 30));
    }

    #[test]
    fn night_bus_rolls_to_next_date() {
        let now = local(2024, 3, 15, 23, 55);
        let dt = resolve_departure(time("24:10:00"), now, warsaw()).unwrap();
        assert_eq!(dt, local(2024, 3, 16, 0, 10));

        let dt = resolve_departure(time("27:45:00"), now, warsaw()).unwrap();
        assert_eq!(dt, local(2024, 3, 16, 3, 45));
    }

    #[test]
    fn night_bus_rolls_over_month_end() {
        let now = local(2024, 2, 29, 23, 30);
        let dt = resolve_departure(time("24:05:00"), now, warsaw()).unwrap();
        assert_eq!(dt, local(2024, 3, 1, 0, 5));
    }

    #[test]
    fn date_comes_from_configured_zone() {
        // 23:30 UTC on the 15th is already the 16th in Warsaw.
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap();
        let dt = resolve_departure(time("06:00:00"), now, warsaw()).unwrap();
        assert_eq!(dt, local(2024, 3, 16, 6, 0));
    }

    #[test]
    fn hour_beyond_two_days_is_unresolvable() {
        let now = local(2024, 3, 15, 10, 0);
        assert_eq!(resolve_departure(time("48:00:00"), now, warsaw()), None);
    }

    #[test]
    fn skipped_local_time_is_unresolvable() {
        // Warsaw springs forward 02:00 -> 03:00 on 31 March 2024.
        let now = local(2024, 3, 31, 1, 0);
        assert_eq!(resolve_departure(time("02:30:00"), now, warsaw()), None);
        assert!(resolve_departure(time("03:30:00"), now, warsaw()).is_some());
    }

    #[test]
    fn repeated_local_time_takes_earlier_instant() {
        // Warsaw falls back 03:00 -> 02:00 on 27 October 2024.
        let now = local(2024, 10, 27, 0, 30);
        let dt = resolve_departure(time("02:30:00"), now, warsaw()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }

    #[test]
    fn minutes_round_down() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 30).unwrap();
        let dep = Utc.with_ymd_and_hms(2024, 3, 15, 10, 5, 0).unwrap();
        assert_eq!(minutes_until(dep, now), 4);
        assert_eq!(minutes_until(now, now), 0);
    }

    #[test]
    fn minutes_negative_for_past() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 30).unwrap();
        let dep = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(minutes_until(dep, now), -1);
    }

    #[test]
    fn resolved_date_sanity() {
        let now = local(2024, 12, 31, 23, 50);
        let dt = resolve_departure(time("24:00:00"), now, warsaw())
            .unwrap()
            .with_timezone(&warsaw());
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.hour(), 0);
    }
}
