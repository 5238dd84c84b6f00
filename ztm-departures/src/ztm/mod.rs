//! ZTM (Warsaw public transport) open-data client.
//!
//! Key characteristics of the timetable API:
//! - One request returns the whole day's timetable for one line at one stop
//! - Records are lists of key/value pairs, not flat objects
//! - Times are "HH:MM:SS" with hours >= 24 for trips after midnight

mod client;
mod error;
mod mock;
mod types;

pub use client::{ScheduleSource, TIMETABLE_DATASET_ID, ZtmClient, ZtmConfig};
pub use error::ZtmError;
pub use mock::MockScheduleSource;
pub use types::{FieldEntry, RawRecord, TimetableResponse, decode_timetable};
