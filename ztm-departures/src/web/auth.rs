//! Shared-secret check on the `X-Auth-Token` header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::dto::AppError;

/// Header carrying the shared secret.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Reject requests whose token does not match. `None` lets everything through.
pub async fn require_token(
    State(expected): State<Option<Arc<str>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = expected {
        let provided = request
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok());

        if !provided.is_some_and(|p| token_matches(p, &expected)) {
            tracing::warn!(uri = %request.uri(), "rejected request with bad auth token");
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Compare tokens without exiting early on the first differing byte.
fn token_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
