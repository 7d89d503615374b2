//! Read-only snapshot of the game for presentation.

use std::collections::BTreeMap;

use questmap_core::zone::Zone;
use serde::Serialize;

use crate::domain::session::QuizSession;
use crate::domain::state::{GamePhase, GameState};
use crate::domain::tracker::ZoneProgress;

/// A question as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    /// Prompt text.
    pub prompt: String,
    /// Answer choices in display order.
    pub choices: Vec<String>,
    /// Index of the correct choice, revealed only once the question has
    /// been answered.
    pub correct_index: Option<usize>,
}

/// The active quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    /// The zone being played.
    pub zone_id: u32,
    /// Every question of the quiz.
    pub questions: Vec<QuestionView>,
    /// Zero-based index of the current question.
    pub current_question_index: usize,
    /// Correct answers so far.
    pub correct_answers: usize,
    /// Whether the current question has been answered.
    pub answered_current: bool,
    /// Correct answers needed to pass.
    pub questions_needed: usize,
    /// Number of questions.
    pub total: usize,
}

/// Everything presentation may read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    /// Current phase.
    pub phase: GamePhase,
    /// Lowest incomplete zone, `None` once all are complete.
    pub active_zone_id: Option<u32>,
    /// Configuration of the active zone.
    pub current_zone: Option<Zone>,
    /// Completion per zone id.
    pub zone_progress: BTreeMap<u32, ZoneProgress>,
    /// Number of completed zones.
    pub completed_zones: usize,
    /// Running score.
    pub score: u32,
    /// Whether a quiz is in progress.
    pub is_quiz_active: bool,
    /// The quiz in progress.
    pub quiz: Option<QuizView>,
}

impl GameView {
    /// Builds a snapshot of `state`.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let tracker = state.tracker();
        let zone_progress = tracker
            .catalog()
            .zones()
            .iter()
            .zip(tracker.progress())
            .map(|(zone, progress)| (zone.id, *progress))
            .collect();
        let quiz = state
            .session()
            .map(|session| QuizView::from_session(session, state));

        Self {
            phase: state.phase(),
            active_zone_id: tracker.active_zone_id(),
            current_zone: tracker.active_zone().cloned(),
            zone_progress,
            completed_zones: tracker.completed_count(),
            score: state.score(),
            is_quiz_active: quiz.is_some(),
            quiz,
        }
    }
}

impl QuizView {
    fn from_session(session: &QuizSession, state: &GameState) -> Self {
        let current = session.current_index();
        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answered =
                    index < current || (index == current && session.answered_current());
                QuestionView {
                    prompt: question.prompt().to_owned(),
                    choices: question.choices().to_vec(),
                    correct_index: answered.then(|| question.correct_index()),
                }
            })
            .collect();

        Self {
            zone_id: session.zone_id(),
            questions,
            current_question_index: current,
            correct_answers: session.correct_count(),
            answered_current: session.answered_current(),
            questions_needed: session.questions_needed(state.rules().pass_threshold),
            total: session.total(),
        }
    }
}
