//! Normalized, provider-independent questions.

use serde::Serialize;
use thiserror::Error;

/// Why a candidate question was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// Fewer than two answer choices.
    #[error("a question needs at least two answer choices, got {0}")]
    TooFewChoices(usize),

    /// `correct_index` points past the end of the choices.
    #[error("correct index {index} is out of range for {len} choices")]
    CorrectIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of choices.
        len: usize,
    },

    /// Two choices share the same text.
    #[error("duplicate answer choice: {0:?}")]
    DuplicateChoice(String),
}

/// A multiple-choice question.
///
/// Choices are distinct, so the correct answer's text appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Builds a question, enforcing its invariants.
    ///
    /// # Errors
    ///
    /// Returns a `QuestionError` if there are fewer than two choices, the
    /// correct index is out of range, or any two choices are equal.
    pub fn new(
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices(choices.len()));
        }
        if correct_index >= choices.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: choices.len(),
            });
        }
        for (i, choice) in choices.iter().enumerate() {
            if choices[..i].contains(choice) {
                return Err(QuestionError::DuplicateChoice(choice.clone()));
            }
        }
        Ok(Self {
            prompt: prompt.into(),
            choices,
            correct_index,
        })
    }

    /// The question text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer choices in display order.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Index of the correct choice.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct choice.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.choices[self.correct_index]
    }

    /// Whether `choice` is the correct index.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }
}
