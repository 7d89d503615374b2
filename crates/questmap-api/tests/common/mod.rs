//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questmap_core::rules::GameRules;
use questmap_core::source::QuestionSource;
use questmap_core::zone::ZoneCatalog;
use questmap_engine::Game;
use questmap_test_support::{FixedClock, ScriptedQuestionSource, catalog, questions};
use tower::ServiceExt;

use questmap_api::routes;
use questmap_api::state::AppState;

/// Build the full app router around `source`, with three four-question zones
/// and default rules. Uses the same route structure as `main.rs`.
pub fn build_test_app_with(source: Arc<dyn QuestionSource>) -> Router {
    build_app(catalog(&[4, 4, 4]), source)
}

/// Build the full app router for an arbitrary catalog.
pub fn build_app(catalog: ZoneCatalog, source: Arc<dyn QuestionSource>) -> Router {
    let game = Game::new(
        Arc::new(catalog),
        GameRules::default(),
        source,
        Arc::new(FixedClock::at_test_epoch()),
    );
    routes::app(AppState::new(Arc::new(game)))
}

/// Build the full app router with a source that always returns the
/// `questions(4)` fixture set.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(ScriptedQuestionSource::always(questions(4))))
}

/// Send a POST request with an optional JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method("POST").uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Submit `choices` in order, advancing after each answer.
pub async fn answer_quiz(app: &Router, choices: &[usize]) {
    for &choice in choices {
        let (status, _) = post_json(
            app,
            "/api/v1/game/answer",
            Some(&serde_json::json!({ "choice_index": choice })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        post_json(app, "/api/v1/game/next", None).await;
    }
}

/// Choices for the `questions(total)` fixture set with the first `correct`
/// answered right. The fixture puts the answer to question `i` at `i % 4`.
pub fn fixture_choices(total: usize, correct: usize) -> Vec<usize> {
    (0..total)
        .map(|i| if i < correct { i % 4 } else { (i + 1) % 4 })
        .collect()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
