//! ZTM timetable API response DTOs.
//!
//! `dbtimetable_get` answers `{"result": [record, ...]}` where every record
//! is itself a list of `{"key": .., "value": ..}` entries. On bad
//! parameters the API puts an error string in `result` instead, and for
//! stops without service it may send `null`. Neither is an error for us:
//! both mean "no readings".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{"key": .., "value": ..}` pair of a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldEntry {
    pub key: String,

    /// The API sends JSON `null` for some empty fields.
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// One schedule entry as delivered by the API.
pub type RawRecord = Vec<FieldEntry>;

/// Top-level response from `dbtimetable_get`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableResponse {
    /// Kept untyped: may be a list, `null`, or an error message string.
    #[serde(default)]
    pub result: Value,
}

impl TimetableResponse {
    /// Extract the records, treating an absent or non-list payload as empty.
    ///
    /// Individual records that are not lists of key/value entries are
    /// skipped with a warning.
    pub fn into_records(self) -> Vec<RawRecord> {
        let items = match self.result {
            Value::Array(items) => items,
            Value::Null => {
                tracing::debug!("timetable result is null");
                return Vec::new();
            }
            other => {
                tracing::debug!(result = %other, "timetable result is not a list");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed timetable record");
                    None
                }
            })
            .collect()
    }
}

/// Parse a response body into records.
///
/// Shared by the live client and the mock so both see identical decoding.
pub fn decode_timetable(body: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    let response: TimetableResponse = serde_json::from_str(body)?;
    Ok(response.into_records())
}
