//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedDepartureBoard;

/// Shared application state.
pub struct AppState<S> {
    /// Cached departure board
    pub board: Arc<CachedDepartureBoard<S>>,

    /// Expected `X-Auth-Token` value, if the check is enabled
    pub auth_token: Option<Arc<str>>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(board: CachedDepartureBoard<S>, auth_token: Option<String>) -> Self {
        Self {
            board: Arc::new(board),
            auth_token: auth_token.map(Arc::from),
        }
    }
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
            auth_token: self.auth_token.clone(),
        }
    }
}
