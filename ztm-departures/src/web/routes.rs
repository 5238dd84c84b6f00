//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::get,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;

use crate::board::{BoardRequest, BoardResponse};
use crate::domain::{StopRef, parse_line_list};
use crate::ztm::ScheduleSource;

use super::auth::require_token;
use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: ScheduleSource + 'static>(state: AppState<S>) -> Router {
    let schedule = Router::new()
        .route("/schedule/:stop_id/:stop_number", get(schedule::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.auth_token.clone(),
            require_token,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(schedule)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Soonest departures at a stop for the requested lines.
async fn schedule<S: ScheduleSource + 'static>(
    State(state): State<AppState<S>>,
    Path((stop_id, stop_number)): Path<(u32, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<BoardResponse>, AppError> {
    let query = ScheduleQuery::from_pairs(pairs);
    let lines = parse_line_list(query.lines.as_deref().unwrap_or_default());
    if lines.is_empty() {
        return Err(AppError::Unprocessable {
            message: "Missing or invalid 'lines' query parameter. Use e.g. ?lines=14,16,19"
                .to_string(),
        });
    }

    let request = BoardRequest::new(StopRef::new(stop_id, stop_number), lines);
    let board = state.board.departures(&request, Utc::now()).await?;

    Ok(Json(board))
}
