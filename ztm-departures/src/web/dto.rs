//! Data transfer objects for web requests and responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::board::BoardError;

/// Query string of `GET /schedule/{stop_id}/{stop_number}`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    /// Comma-separated line numbers, e.g. "14,16,19"
    pub lines: Option<String>,
}

impl ScheduleQuery {
    /// Build from raw query pairs. A repeated `lines` key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let lines = pairs
            .into_iter()
            .find(|(key, _)| key == "lines")
            .map(|(_, value)| value);
        Self { lines }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum AppError {
    /// Request was understood but its parameters are unusable
    Unprocessable { message: String },
    /// Missing or wrong `X-Auth-Token`
    Unauthorized,
    /// Upstream could not produce any data
    BadGateway { details: String },
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        AppError::BadGateway {
            details: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unprocessable { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: message,
                    details: None,
                },
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    error: "Unauthorized".to_string(),
                    details: None,
                },
            ),
            AppError::BadGateway { details } => {
                tracing::error!(%details, "failed to fetch departures");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Failed to fetch data".to_string(),
                        details: Some(details),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
