//! Domain events recorded in the game journal.

use questmap_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Event type identifier for [`GameEventKind::GameStarted`].
pub const GAME_STARTED_EVENT_TYPE: &str = "game.started";

/// Event type identifier for [`GameEventKind::ZoneStarted`].
pub const ZONE_STARTED_EVENT_TYPE: &str = "game.zone_started";

/// Event type identifier for [`GameEventKind::AnswerRecorded`].
pub const ANSWER_RECORDED_EVENT_TYPE: &str = "game.answer_recorded";

/// Event type identifier for [`GameEventKind::QuizAbandoned`].
pub const QUIZ_ABANDONED_EVENT_TYPE: &str = "game.quiz_abandoned";

/// Event type identifier for [`GameEventKind::ZoneEvaluated`].
pub const ZONE_EVALUATED_EVENT_TYPE: &str = "game.zone_evaluated";

/// Event type identifier for [`GameEventKind::GameFinished`].
pub const GAME_FINISHED_EVENT_TYPE: &str = "game.finished";

/// Event type identifier for [`GameEventKind::GameReset`].
pub const GAME_RESET_EVENT_TYPE: &str = "game.reset";

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEventKind {
    /// The player left the splash screen.
    GameStarted,
    /// A quiz began for a zone.
    ZoneStarted {
        /// The zone being played.
        zone_id: u32,
        /// Number of questions loaded.
        question_count: usize,
    },
    /// An answer was scored.
    AnswerRecorded {
        /// The zone being played.
        zone_id: u32,
        /// Index of the answered question.
        question_index: usize,
        /// Whether the answer was correct.
        correct: bool,
    },
    /// The quiz was closed without evaluation.
    QuizAbandoned {
        /// The zone that was being played.
        zone_id: u32,
    },
    /// A finished quiz was evaluated against the pass threshold.
    ZoneEvaluated {
        /// The evaluated zone.
        zone_id: u32,
        /// Correct answers given.
        correct: usize,
        /// Correct answers required to pass.
        required: usize,
        /// Whether the zone was completed.
        passed: bool,
    },
    /// The final zone was completed.
    GameFinished {
        /// Final score.
        score: u32,
    },
    /// All progress was cleared.
    GameReset,
}

impl GameEventKind {
    /// The type name used in event metadata.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GameStarted => GAME_STARTED_EVENT_TYPE,
            Self::ZoneStarted { .. } => ZONE_STARTED_EVENT_TYPE,
            Self::AnswerRecorded { .. } => ANSWER_RECORDED_EVENT_TYPE,
            Self::QuizAbandoned { .. } => QUIZ_ABANDONED_EVENT_TYPE,
            Self::ZoneEvaluated { .. } => ZONE_EVALUATED_EVENT_TYPE,
            Self::GameFinished { .. } => GAME_FINISHED_EVENT_TYPE,
            Self::GameReset => GAME_RESET_EVENT_TYPE,
        }
    }
}

/// Domain event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
