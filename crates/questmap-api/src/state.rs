//! Shared application state.

use std::sync::Arc;

use questmap_engine::Game;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The single game this server hosts.
    pub game: Arc<Game>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(game: Arc<Game>) -> Self {
        Self { game }
    }
}
