//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use questmap_engine::GamePhase;
use serde::Serialize;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Number of zones in the loaded catalog.
    pub zones: usize,
    /// Phase of the hosted game.
    pub phase: GamePhase,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let view = state.game.view();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        zones: view.zone_progress.len(),
        phase: view.phase,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
