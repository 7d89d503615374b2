//! Questmap API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questmap_core::error::GameError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or the zone catalog is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `GameError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            GameError::SourceUnavailable(_) => (StatusCode::BAD_GATEWAY, "source_unavailable"),
            GameError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "malformed_response"),
            GameError::EmptyQuestionSet { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "empty_question_set")
            }
            GameError::StaleZoneEvaluation { .. } => {
                (StatusCode::CONFLICT, "stale_zone_evaluation")
            }
            GameError::InvalidPhase { .. } => (StatusCode::CONFLICT, "invalid_phase"),
            GameError::NoActiveZone => (StatusCode::CONFLICT, "no_active_zone"),
            GameError::NoActiveQuiz => (StatusCode::CONFLICT, "no_active_quiz"),
            GameError::QuizIncomplete => (StatusCode::CONFLICT, "quiz_incomplete"),
            GameError::FetchSuperseded => (StatusCode::CONFLICT, "fetch_superseded"),
            GameError::ChoiceOutOfRange { .. } => (StatusCode::BAD_REQUEST, "choice_out_of_range"),
            GameError::InvalidConfig(_) => (StatusCode::BAD_REQUEST, "invalid_config"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
