//! Merging per-line results into one board.

use crate::domain::{Line, ResolvedDeparture};

use super::fetch::LineResult;

/// Maximum number of departures on a board.
pub const MAX_DEPARTURES: usize = 5;

/// Ordering stand-in for departures whose minutes are unknown.
const UNKNOWN_MINUTES: i64 = 1_000_000;

/// Sort departures soonest first, unknown times last.
///
/// The sort is stable, so equal times keep their line order.
pub fn sort_departures(departures: &mut [ResolvedDeparture]) {
    departures.sort_by_key(|d| {
        (
            d.minutes_until_departure.is_none(),
            d.minutes_until_departure.unwrap_or(UNKNOWN_MINUTES),
        )
    });
}

/// Flatten per-line results into the `limit` soonest departures.
///
/// Unavailable lines contribute nothing.
pub fn aggregate(results: &[(Line, LineResult)], limit: usize) -> Vec<ResolvedDeparture> {
    let mut departures: Vec<ResolvedDeparture> = results
        .iter()
        .filter_map(|(line, result)| match result {
            LineResult::Available(upcoming) => Some((*line, upcoming)),
            LineResult::Unavailable(_) => None,
        })
        .flat_map(|(line, upcoming)| {
            upcoming.iter().map(move |u| ResolvedDeparture {
                line,
                direction: u.reading.direction.clone(),
                display_time: u.reading.display_time(),
                minutes_until_departure: Some(u.minutes_until),
            })
        })
        .collect();

    sort_departures(&mut departures);
    departures.truncate(limit);
    departures
}
