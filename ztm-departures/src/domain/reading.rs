//! Schedule readings folded from upstream key/value records.
//!
//! The timetable API does not return flat objects. Each record is a list
//! of `{"key": .., "value": ..}` entries, so a reading is built by folding
//! those entries over a fixed set of recognised field names.

use super::time::{ScheduledTime, TimeFormatError};

/// Direction used when a record carries none.
pub const DEFAULT_DIRECTION: &str = "na";

/// Time used when a record carries none.
pub const DEFAULT_TIME: &str = "00:00:00";

/// One scheduled departure for a single line at a single stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReading {
    /// Headsign of the trip (`kierunek`).
    pub direction: String,

    /// Scheduled departure time (`czas`).
    pub scheduled_time: ScheduledTime,

    /// Timetable footnote symbols (`symbol_1`, `symbol_2`).
    pub symbol_1: Option<String>,
    pub symbol_2: Option<String>,

    /// Route variant code (`trasa`).
    pub route: Option<String>,

    /// Vehicle duty / brigade number (`brygada`).
    pub brigade: Option<String>,
}

impl RawReading {
    /// Build a reading from a bag of named fields.
    ///
    /// Unknown field names are ignored. A missing direction or time falls
    /// back to [`DEFAULT_DIRECTION`] / [`DEFAULT_TIME`]. When a name occurs
    /// more than once the last value wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use ztm_departures::domain::RawReading;
    ///
    /// let reading = RawReading::from_fields([
    ///     ("kierunek", "Centrum"),
    ///     ("czas", "24:10:00"),
    ///     ("unknown", "ignored"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(reading.direction, "Centrum");
    /// assert!(reading.is_night_bus());
    ///
    /// assert!(RawReading::from_fields([("czas", "abc")]).is_err());
    /// ```
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, TimeFormatError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields_seen = Fields::default();

        for (key, value) in fields {
            let slot = match key.as_ref() {
                "kierunek" => &mut fields_seen.direction,
                "czas" => &mut fields_seen.time,
                "symbol_1" => &mut fields_seen.symbol_1,
                "symbol_2" => &mut fields_seen.symbol_2,
                "trasa" => &mut fields_seen.route,
                "brygada" => &mut fields_seen.brigade,
                _ => continue,
            };
            *slot = Some(value.into());
        }

        let time = fields_seen.time.as_deref().unwrap_or(DEFAULT_TIME);
        let scheduled_time = ScheduledTime::parse(time)?;

        Ok(Self {
            direction: fields_seen
                .direction
                .unwrap_or_else(|| DEFAULT_DIRECTION.to_string()),
            scheduled_time,
            symbol_1: fields_seen.symbol_1,
            symbol_2: fields_seen.symbol_2,
            route: fields_seen.route,
            brigade: fields_seen.brigade,
        })
    }

    pub fn is_night_bus(&self) -> bool {
        self.scheduled_time.is_night_bus()
    }

    /// `HH:MM` as shown to riders.
    pub fn display_time(&self) -> String {
        self.scheduled_time.display_hhmm()
    }
}

/// Recognised fields collected during the fold.
#[derive(Default)]
struct Fields {
    direction: Option<String>,
    time: Option<String>,
    symbol_1: Option<String>,
    symbol_2: Option<String>,
    route: Option<String>,
    brigade: Option<String>,
}
