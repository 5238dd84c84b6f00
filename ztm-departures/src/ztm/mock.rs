//! Mock timetable source for running without API access.
//!
//! Serves canned response bodies per line as if they came from the live
//! API. Bodies go through the same decoding as real responses.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::{Line, StopRef};

use super::client::ScheduleSource;
use super::error::ZtmError;
use super::types::{RawRecord, decode_timetable};

/// Canned answer for one line.
#[derive(Debug, Clone)]
enum MockAnswer {
    Body(String),
    Status(u16),
}

/// Mock ZTM source that serves data from memory or JSON files.
///
/// The stop is ignored: every stop sees the same per-line answers.
#[derive(Debug, Clone, Default)]
pub struct MockScheduleSource {
    answers: HashMap<Line, MockAnswer>,
}

impl MockScheduleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load response bodies from a directory of `{line}.json` files.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, ZtmError> {
        let data_dir = data_dir.as_ref();
        let mut source = Self::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            ZtmError::NotConfigured(format!("failed to read mock data directory: {e}"))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                ZtmError::NotConfigured(format!("failed to read directory entry: {e}"))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            // "14.json" -> line 14
            let Some(line) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Line::parse(s).ok())
            else {
                tracing::warn!(path = %path.display(), "ignoring mock file without a line number");
                continue;
            };

            let body = std::fs::read_to_string(&path).map_err(|e| {
                ZtmError::NotConfigured(format!("failed to read {}: {e}", path.display()))
            })?;

            source = source.with_body(line, body);
        }

        if source.answers.is_empty() {
            return Err(ZtmError::NotConfigured(format!(
                "no mock timetable files found in {}",
                data_dir.display()
            )));
        }

        Ok(source)
    }

    /// Serve `body` verbatim for `line`.
    pub fn with_body(mut self, line: Line, body: impl Into<String>) -> Self {
        self.answers.insert(line, MockAnswer::Body(body.into()));
        self
    }

    /// Serve records built from `(key, value)` pairs for `line`.
    pub fn with_records<'a>(
        self,
        line: Line,
        records: impl IntoIterator<Item = &'a [(&'a str, &'a str)]>,
    ) -> Self {
        let result: Vec<serde_json::Value> = records
            .into_iter()
            .map(|fields| {
                fields
                    .iter()
                    .map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
                    .collect()
            })
            .collect();

        let body = serde_json::json!({ "result": result }).to_string();
        self.with_body(line, body)
    }

    /// Answer `line` with an HTTP error status.
    pub fn with_status(mut self, line: Line, status: u16) -> Self {
        self.answers.insert(line, MockAnswer::Status(status));
        self
    }

    /// Lines that have a canned answer.
    pub fn available_lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self.answers.keys().copied().collect();
        lines.sort();
        lines
    }
}

impl ScheduleSource for MockScheduleSource {
    async fn fetch_records(&self, _stop: &StopRef, line: Line) -> Result<Vec<RawRecord>, ZtmError> {
        match self.answers.get(&line) {
            Some(MockAnswer::Body(body)) => decode_timetable(body).map_err(|e| ZtmError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            }),
            Some(MockAnswer::Status(status)) => Err(ZtmError::Api {
                status: *status,
                message: "mock error".to_string(),
            }),
            None => Err(ZtmError::Api {
                status: 404,
                message: format!(
                    "no mock data for line {line}. Available: {:?}",
                    self.available_lines()
                ),
            }),
        }
    }
}
