//! ZTM client error types.

/// Errors from fetching one line's timetable.
#[derive(Debug, thiserror::Error)]
pub enum ZtmError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-200 status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body was not the expected JSON document
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client could not be configured (e.g. unusable API key)
    #[error("not configured: {0}")]
    NotConfigured(String),
}
