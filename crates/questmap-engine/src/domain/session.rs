//! The quiz session: one attempt at one zone's question set.

use std::sync::Arc;

use questmap_core::error::GameError;
use questmap_core::question::Question;
use questmap_core::rules::PassThreshold;
use serde::Serialize;

/// Result of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The answer was correct and counted.
    Correct,
    /// The answer was wrong; `correct_index` is the right choice.
    Incorrect {
        /// Index of the correct choice.
        correct_index: usize,
    },
    /// The current question was already answered; nothing changed.
    AlreadyAnswered,
}

/// In-progress quiz for a single zone.
///
/// `current_index` and `correct_count` only grow, and each question is
/// scored at most once.
#[derive(Debug, Clone)]
pub struct QuizSession {
    zone_id: u32,
    questions: Arc<[Question]>,
    current_index: usize,
    correct_count: usize,
    answered_current: bool,
}

impl QuizSession {
    /// Starts a session at the first question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::EmptyQuestionSet` if `questions` is empty.
    pub fn start(zone_id: u32, questions: Arc<[Question]>) -> Result<Self, GameError> {
        if questions.is_empty() {
            return Err(GameError::EmptyQuestionSet { zone_id });
        }
        Ok(Self {
            zone_id,
            questions,
            current_index: 0,
            correct_count: 0,
            answered_current: false,
        })
    }

    /// Scores `choice` against the current question.
    ///
    /// Repeat submissions before [`advance`](Self::advance), and submissions
    /// after the last question, return `AlreadyAnswered` and change nothing.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ChoiceOutOfRange` if `choice` does not index an
    /// answer of the current question. The question stays unanswered.
    pub fn submit_answer(&mut self, choice: usize) -> Result<AnswerOutcome, GameError> {
        if self.answered_current {
            return Ok(AnswerOutcome::AlreadyAnswered);
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return Ok(AnswerOutcome::AlreadyAnswered);
        };
        if choice >= question.choices().len() {
            return Err(GameError::ChoiceOutOfRange {
                choice,
                available: question.choices().len(),
            });
        }

        self.answered_current = true;
        if question.is_correct(choice) {
            self.correct_count += 1;
            Ok(AnswerOutcome::Correct)
        } else {
            Ok(AnswerOutcome::Incorrect {
                correct_index: question.correct_index(),
            })
        }
    }

    /// Moves past the answered current question. Returns `false` and does
    /// nothing if the current question has not been answered.
    pub fn advance(&mut self) -> bool {
        if !self.answered_current {
            return false;
        }
        self.current_index += 1;
        self.answered_current = false;
        true
    }

    /// True once every question has been advanced past.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// True when no unanswered question remains, including the moment the
    /// last question is answered but not yet advanced past.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.is_complete() || (self.answered_current && self.current_index + 1 == self.questions.len())
    }

    /// `correct_count >= ceil(total * threshold)`.
    #[must_use]
    pub fn passed(&self, threshold: PassThreshold) -> bool {
        threshold.is_met(self.correct_count, self.questions.len())
    }

    /// Correct answers needed to pass.
    #[must_use]
    pub fn questions_needed(&self, threshold: PassThreshold) -> usize {
        threshold.questions_needed(self.questions.len())
    }

    /// The zone this session belongs to.
    #[must_use]
    pub fn zone_id(&self) -> u32 {
        self.zone_id
    }

    /// The loaded question set.
    #[must_use]
    pub fn questions(&self) -> &Arc<[Question]> {
        &self.questions
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Correct answers so far.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Whether the current question has been answered.
    #[must_use]
    pub fn answered_current(&self) -> bool {
        self.answered_current
    }

    /// Number of questions in the set.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}
