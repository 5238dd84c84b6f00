//! Web layer for the departure board.
//!
//! Provides the HTTP endpoint for stop schedules plus a health check.

mod auth;
mod dto;
mod routes;
mod state;

pub use auth::AUTH_HEADER;
pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
