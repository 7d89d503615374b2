//! HTTP routes.

use axum::Router;

use crate::state::AppState;

pub mod game;
pub mod health;

/// The full application router, without middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/game", game::router())
        .with_state(state)
}
