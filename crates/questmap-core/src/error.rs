//! Domain error types.

use thiserror::Error;

/// Failure reported by a question source.
///
/// `Clone` so one fetch result can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The provider could not be reached, timed out, or refused service.
    #[error("question source unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with data that does not decode into questions.
    #[error("malformed question source response: {0}")]
    Malformed(String),
}

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Network or provider failure. Retryable.
    #[error("question source unavailable: {0}")]
    SourceUnavailable(String),

    /// The provider returned unusable data. Retryable.
    #[error("malformed question source response: {0}")]
    MalformedResponse(String),

    /// A fetch succeeded but produced zero questions for the zone.
    #[error("zone {zone_id} produced an empty question set")]
    EmptyQuestionSet {
        /// The zone whose fetch came back empty.
        zone_id: u32,
    },

    /// An evaluation targeted a zone that is not the active zone.
    #[error("zone {zone_id} is not the active zone (active: {active:?})")]
    StaleZoneEvaluation {
        /// The zone the caller tried to evaluate.
        zone_id: u32,
        /// The zone that is actually active, if any.
        active: Option<u32>,
    },

    /// The action is not allowed in the current game phase.
    #[error("cannot {action} while the game is in phase {phase}")]
    InvalidPhase {
        /// The attempted action.
        action: &'static str,
        /// The phase the game was in.
        phase: &'static str,
    },

    /// Every zone is already complete.
    #[error("no active zone remains")]
    NoActiveZone,

    /// The action needs a running quiz and there is none.
    #[error("no quiz is active")]
    NoActiveQuiz,

    /// The quiz still has unanswered questions.
    #[error("quiz has unanswered questions")]
    QuizIncomplete,

    /// The submitted choice does not index an answer of the current question.
    #[error("choice {choice} is out of range for {available} answers")]
    ChoiceOutOfRange {
        /// The submitted index.
        choice: usize,
        /// Number of answer choices on the question.
        available: usize,
    },

    /// A fetch finished after the game was reset or moved on; its result was discarded.
    #[error("question fetch was superseded and its result discarded")]
    FetchSuperseded,

    /// A configuration value or catalog failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<SourceError> for GameError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Unavailable(msg) => Self::SourceUnavailable(msg),
            SourceError::Malformed(msg) => Self::MalformedResponse(msg),
        }
    }
}
