//! Questmap API server entry point.

use std::sync::Arc;

use questmap_api::config::ServerConfig;
use questmap_api::error::AppError;
use questmap_api::routes;
use questmap_api::state::AppState;
use questmap_core::event::SystemClock;
use questmap_engine::Game;
use questmap_trivia::OpenTriviaSource;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questmap API server");

    let config = ServerConfig::from_env()?;
    let catalog = config.load_catalog()?;
    tracing::info!(
        zones = catalog.len(),
        trivia_base_url = %config.trivia.base_url,
        "configuration loaded"
    );

    let source = OpenTriviaSource::new(&config.trivia)
        .map_err(|e| AppError::Config(format!("cannot create question source: {e}")))?;
    let game = Game::new(
        Arc::new(catalog),
        config.rules,
        Arc::new(source),
        Arc::new(SystemClock),
    );
    let app_state = AppState::new(Arc::new(game));

    // TODO: Replace CorsLayer::permissive() with the presentation origin once it is deployed.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
