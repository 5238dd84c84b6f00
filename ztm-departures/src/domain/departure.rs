//! Departures as returned to riders.

use serde::{Deserialize, Serialize};

use super::line::Line;

/// A departure stamped with its line, ready for the response body.
///
/// Field names match the public JSON shape (`time`, `time_to_depart`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDeparture {
    pub line: Line,

    pub direction: String,

    /// `HH:MM` as published by the timetable (night buses read "24:10").
    #[serde(rename = "time")]
    pub display_time: String,

    /// Whole minutes until departure, `None` when the instant is unknown.
    #[serde(rename = "time_to_depart")]
    pub minutes_until_departure: Option<i64>,
}
