//! Routes for the game facade: read-only state plus the player actions.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use questmap_core::event::EventRecord;
use questmap_engine::{AnswerOutcome, GameView, QuizStarted, ZoneOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Index of the chosen answer.
    pub choice_index: usize,
}

/// Result of POST /next.
#[derive(Debug, Serialize)]
pub struct AdvanceOutcome {
    /// Whether the quiz moved to another question.
    pub advanced: bool,
}

/// Response to an action: its outcome and the game state afterwards.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    /// Action-specific result.
    pub outcome: T,
    /// Snapshot taken after the action.
    pub game: GameView,
}

fn respond<T>(state: &AppState, outcome: T) -> Json<ActionResponse<T>> {
    Json(ActionResponse {
        outcome,
        game: state.game.view(),
    })
}

/// GET /
async fn get_game(State(state): State<AppState>) -> Json<GameView> {
    Json(state.game.view())
}

/// GET /events
async fn get_events(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    let records = state
        .game
        .events()
        .iter()
        .map(|event| EventRecord::from_event(event))
        .collect();
    Json(records)
}

/// POST /start
#[instrument(skip(state))]
async fn start_game(State(state): State<AppState>) -> Result<Json<GameView>, ApiError> {
    state.game.start_game()?;
    info!("handling start_game");
    Ok(Json(state.game.view()))
}

/// POST /zone/start
#[instrument(skip(state))]
async fn start_active_zone(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<QuizStarted>>, ApiError> {
    let started = state.game.start_active_zone().await?;
    info!(zone_id = started.zone_id, "handling start_active_zone");
    Ok(respond(&state, started))
}

/// POST /answer
#[instrument(skip(state, request), fields(choice_index = request.choice_index))]
async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<ActionResponse<AnswerOutcome>>, ApiError> {
    let outcome = state.game.submit_answer(request.choice_index)?;
    Ok(respond(&state, outcome))
}

/// POST /next
#[instrument(skip(state))]
async fn next_question(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<AdvanceOutcome>>, ApiError> {
    let advanced = state.game.next_question()?;
    Ok(respond(&state, AdvanceOutcome { advanced }))
}

/// POST /finish
#[instrument(skip(state))]
async fn finish_quiz(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse<ZoneOutcome>>, ApiError> {
    let outcome = state.game.finish_quiz()?;
    info!(
        zone_id = outcome.zone_id,
        passed = outcome.passed,
        "handling finish_quiz"
    );
    Ok(respond(&state, outcome))
}

/// POST /abandon
#[instrument(skip(state))]
async fn abandon_quiz(State(state): State<AppState>) -> Result<Json<GameView>, ApiError> {
    state.game.abandon_quiz()?;
    Ok(Json(state.game.view()))
}

/// POST /reset
#[instrument(skip(state))]
async fn reset_game(State(state): State<AppState>) -> Json<GameView> {
    state.game.reset_game();
    info!("handling reset_game");
    Json(state.game.view())
}

/// Returns the router for the game.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_game))
        .route("/events", get(get_events))
        .route("/start", post(start_game))
        .route("/zone/start", post(start_active_zone))
        .route("/answer", post(submit_answer))
        .route("/next", post(next_question))
        .route("/finish", post(finish_quiz))
        .route("/abandon", post(abandon_quiz))
        .route("/reset", post(reset_game))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use questmap_core::error::SourceError;
    use questmap_core::rules::GameRules;
    use questmap_core::source::QuestionSource;
    use questmap_engine::Game;
    use questmap_test_support::{FixedClock, ScriptedQuestionSource, catalog, questions};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state_with(source: Arc<dyn QuestionSource>) -> AppState {
        let game = Game::new(
            Arc::new(catalog(&[4, 4, 4])),
            GameRules::default(),
            source,
            Arc::new(FixedClock::at_test_epoch()),
        );
        AppState::new(Arc::new(game))
    }

    fn test_app_state() -> AppState {
        app_state_with(Arc::new(ScriptedQuestionSource::always(questions(4))))
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_game_returns_splash_view() {
        // Arrange
        let state = test_app_state();

        // Act
        let (status, json) = send(&state, "GET", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["phase"], "SPLASH");
        assert_eq!(json["active_zone_id"], 0);
        assert_eq!(json["is_quiz_active"], false);
    }

    #[tokio::test]
    async fn test_start_twice_returns_409() {
        let state = test_app_state();

        let (first, _) = send(&state, "POST", "/start", None).await;
        let (second, json) = send(&state, "POST", "/start", None).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(json["error"], "invalid_phase");
    }

    #[tokio::test]
    async fn test_start_zone_hides_unanswered_correct_index() {
        // Arrange
        let state = test_app_state();

        // Act
        let (status, json) = send(&state, "POST", "/zone/start", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"]["zone_id"], 0);
        assert_eq!(json["outcome"]["questions_needed"], 3);
        let questions = json["game"]["quiz"]["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q["correct_index"].is_null()));
    }

    #[tokio::test]
    async fn test_answer_reports_outcome_and_reveals_answer() {
        // Arrange
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        // Act
        let (status, json) = send(
            &state,
            "POST",
            "/answer",
            Some(serde_json::json!({ "choice_index": 2 })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["outcome"]["result"], "incorrect");
        assert_eq!(json["outcome"]["correct_index"], 0);
        assert_eq!(json["game"]["quiz"]["questions"][0]["correct_index"], 0);
    }

    #[tokio::test]
    async fn test_answer_out_of_range_returns_400() {
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        let (status, json) = send(
            &state,
            "POST",
            "/answer",
            Some(serde_json::json!({ "choice_index": 9 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "choice_out_of_range");
    }

    #[tokio::test]
    async fn test_answer_without_quiz_returns_409() {
        let state = test_app_state();

        let (status, json) = send(
            &state,
            "POST",
            "/answer",
            Some(serde_json::json!({ "choice_index": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "no_active_quiz");
    }

    #[tokio::test]
    async fn test_answer_with_missing_body_field_is_rejected() {
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        let request = Request::builder()
            .method("POST")
            .uri("/answer")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_finish_with_unanswered_questions_returns_409() {
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        let (status, json) = send(&state, "POST", "/finish", None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "quiz_incomplete");
    }

    #[tokio::test]
    async fn test_source_failure_returns_502() {
        let state = app_state_with(Arc::new(ScriptedQuestionSource::failing(
            SourceError::Unavailable("connection refused".to_owned()),
        )));

        let (status, json) = send(&state, "POST", "/zone/start", None).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "source_unavailable");
    }

    #[tokio::test]
    async fn test_empty_question_set_returns_422() {
        let state = app_state_with(Arc::new(ScriptedQuestionSource::always(Vec::new())));

        let (status, json) = send(&state, "POST", "/zone/start", None).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "empty_question_set");
    }

    #[tokio::test]
    async fn test_next_reports_whether_quiz_advanced() {
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        let (_, before_answer) = send(&state, "POST", "/next", None).await;
        send(
            &state,
            "POST",
            "/answer",
            Some(serde_json::json!({ "choice_index": 0 })),
        )
        .await;
        let (_, after_answer) = send(&state, "POST", "/next", None).await;

        assert_eq!(before_answer["outcome"]["advanced"], false);
        assert_eq!(after_answer["outcome"]["advanced"], true);
        assert_eq!(after_answer["game"]["quiz"]["current_question_index"], 1);
    }

    #[tokio::test]
    async fn test_abandon_and_reset() {
        let state = test_app_state();
        send(&state, "POST", "/zone/start", None).await;

        let (abandon_status, abandoned) = send(&state, "POST", "/abandon", None).await;
        let (reset_status, reset) = send(&state, "POST", "/reset", None).await;

        assert_eq!(abandon_status, StatusCode::OK);
        assert_eq!(abandoned["is_quiz_active"], false);
        assert_eq!(abandoned["phase"], "PLAYING");
        assert_eq!(reset_status, StatusCode::OK);
        assert_eq!(reset["phase"], "SPLASH");
    }

    #[tokio::test]
    async fn test_events_lists_journal() {
        let state = test_app_state();
        send(&state, "POST", "/start", None).await;

        let (status, json) = send(&state, "GET", "/events", None).await;

        assert_eq!(status, StatusCode::OK);
        let events = json.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event_type"], "game.started");
        assert_eq!(events[0]["sequence_number"], 1);
        assert_eq!(events[0]["occurred_at"], "2026-01-15T10:00:00Z");
        assert_eq!(events[0]["payload"]["kind"], "game_started");
    }
}
