//! ZTM open-data HTTP client.
//!
//! One GET per (stop, line) against the `dbtimetable_get` action of the
//! Warsaw open-data API. Authentication is an `apikey` query parameter.

use std::future::Future;
use std::time::Duration;

use crate::domain::{Line, StopRef};

use super::error::ZtmError;
use super::types::{RawRecord, decode_timetable};

/// Default endpoint for the timetable action.
const DEFAULT_BASE_URL: &str = "https://api.um.warszawa.pl/api/action/dbtimetable_get/";

/// Dataset id of the stop timetable resource.
pub const TIMETABLE_DATASET_ID: &str = "e923fa0e-d96c-43f9-ae6e-60518c9f3238";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Somewhere the departure board can fetch a line's timetable records from.
///
/// This abstraction allows the board to be tested with mock data.
pub trait ScheduleSource: Send + Sync {
    /// Fetch the raw timetable records for `line` at `stop`.
    fn fetch_records(
        &self,
        stop: &StopRef,
        line: Line,
    ) -> impl Future<Output = Result<Vec<RawRecord>, ZtmError>> + Send;
}

/// Configuration for the ZTM client.
#[derive(Debug, Clone)]
pub struct ZtmConfig {
    /// API key sent as the `apikey` parameter
    pub api_key: String,
    /// Endpoint URL (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ZtmConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ZTM timetable API client.
#[derive(Debug, Clone)]
pub struct ZtmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ZtmClient {
    /// Create a new ZTM client with the given configuration.
    pub fn new(config: ZtmConfig) -> Result<Self, ZtmError> {
        if config.api_key.trim().is_empty() {
            return Err(ZtmError::NotConfigured("empty API key".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Get the timetable records for one line at one stop.
    pub async fn get_timetable(
        &self,
        stop: &StopRef,
        line: Line,
    ) -> Result<Vec<RawRecord>, ZtmError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("id", TIMETABLE_DATASET_ID.to_string()),
                ("apikey", self.api_key.clone()),
                ("busstopId", stop.id.to_string()),
                ("busstopNr", stop.number.clone()),
                ("line", line.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ZtmError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        decode_timetable(&body).map_err(|e| ZtmError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl ScheduleSource for ZtmClient {
    async fn fetch_records(&self, stop: &StopRef, line: Line) -> Result<Vec<RawRecord>, ZtmError> {
        self.get_timetable(stop, line).await
    }
}
