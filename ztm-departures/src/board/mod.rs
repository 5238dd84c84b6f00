//! Departure board: the soonest departures at one stop for a set of lines.
//!
//! Lines are queried one after another. Each line's readings are parsed,
//! resolved against "now" and filtered, then all lines are merged and cut
//! down to [`MAX_DEPARTURES`].

mod aggregate;
mod fetch;

pub use aggregate::{MAX_DEPARTURES, aggregate, sort_departures};
pub use fetch::{LineResult, UpcomingReading, fetch_line, parse_record, upcoming_readings};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::{Line, ResolvedDeparture, StopRef};
use crate::ztm::ScheduleSource;

/// What a caller asks the board for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRequest {
    pub stop: StopRef,

    /// Lines in request order, without duplicates.
    pub lines: Vec<Line>,
}

impl BoardRequest {
    pub fn new(stop: StopRef, lines: Vec<Line>) -> Self {
        Self { stop, lines }
    }
}

/// The response envelope. Also the value stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardResponse {
    /// At most [`MAX_DEPARTURES`] entries, soonest first.
    pub departures: Vec<ResolvedDeparture>,

    pub stop_id: u32,

    pub stop_number: String,

    pub lines: Vec<Line>,

    /// ISO-8601 timestamp in the configured zone.
    pub updated_at: String,
}

/// Errors that prevent building a board at all.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BoardError {
    /// Every requested line failed upstream
    #[error("all {count} requested lines failed: {details}")]
    AllLinesUnavailable { count: usize, details: String },
}

/// Builds departure boards from a schedule source.
pub struct DepartureBoard<S> {
    source: S,
    zone: Tz,
}

impl<S: ScheduleSource> DepartureBoard<S> {
    /// Create a board reading from `source`, with dates and times taken in `zone`.
    pub fn new(source: S, zone: Tz) -> Self {
        Self { source, zone }
    }

    /// Fetch every requested line and merge the results.
    ///
    /// A failing line only removes that line's departures. The call fails
    /// only when lines were requested and none of them could be fetched.
    pub async fn departures(
        &self,
        request: &BoardRequest,
        now: DateTime<Utc>,
    ) -> Result<BoardResponse, BoardError> {
        let mut results = Vec::with_capacity(request.lines.len());
        for &line in &request.lines {
            let result = fetch_line(&self.source, &request.stop, line, now, self.zone).await;
            results.push((line, result));
        }

        if !results.is_empty() && results.iter().all(|(_, r)| !r.is_available()) {
            let details = results
                .iter()
                .filter_map(|(line, r)| match r {
                    LineResult::Unavailable(e) => Some(format!("line {line}: {e}")),
                    LineResult::Available(_) => None,
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BoardError::AllLinesUnavailable {
                count: results.len(),
                details,
            });
        }

        Ok(BoardResponse {
            departures: aggregate(&results, MAX_DEPARTURES),
            stop_id: request.stop.id,
            stop_number: request.stop.number.clone(),
            lines: request.lines.clone(),
            updated_at: now.with_timezone(&self.zone).to_rfc3339(),
        })
    }
}
