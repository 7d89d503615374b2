//! Open Trivia Database wire format and its normalization into [`Question`]s.

use questmap_core::error::SourceError;
use questmap_core::question::Question;
use questmap_core::rng::{DeterministicRng, shuffle};
use serde::Deserialize;

/// Top-level `api.php` response body.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    /// Provider status code; see [`ResponseCode`].
    pub response_code: u8,
    /// Question records, URL-encoded when requested with `encode=url3986`.
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

/// One question record as sent by the provider.
#[derive(Debug, Deserialize)]
pub struct RawQuestion {
    /// Prompt text.
    pub question: String,
    /// The correct answer text.
    pub correct_answer: String,
    /// Every other answer.
    pub incorrect_answers: Vec<String>,
}

/// Meaning of `response_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// Results returned.
    Success,
    /// Not enough questions exist for the query.
    NoResults,
    /// The query contained an invalid parameter.
    InvalidParameter,
    /// Session token does not exist.
    TokenNotFound,
    /// Session token has returned every possible question.
    TokenEmpty,
    /// Too many requests from this address.
    RateLimited,
    /// A code this client does not know.
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NoResults,
            2 => Self::InvalidParameter,
            3 => Self::TokenNotFound,
            4 => Self::TokenEmpty,
            5 => Self::RateLimited,
            other => Self::Unknown(other),
        }
    }
}

impl ApiResponse {
    /// Converts the response into at most `limit` normalized questions.
    ///
    /// A `NoResults` response is an empty success: the provider answered
    /// correctly that it has nothing for the query.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` when rate limited and
    /// `SourceError::Malformed` for other non-success codes or records that
    /// cannot be decoded into valid questions.
    pub fn into_questions(
        self,
        limit: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Vec<Question>, SourceError> {
        match ResponseCode::from(self.response_code) {
            ResponseCode::Success => {}
            ResponseCode::NoResults => return Ok(Vec::new()),
            ResponseCode::RateLimited => {
                return Err(SourceError::Unavailable(
                    "provider rate limit exceeded".to_owned(),
                ));
            }
            other => {
                return Err(SourceError::Malformed(format!(
                    "provider rejected the request: {other:?}"
                )));
            }
        }

        self.results
            .into_iter()
            .take(limit)
            .map(|raw| raw.normalize(rng))
            .collect()
    }
}

impl RawQuestion {
    /// Decodes the texts and shuffles the correct answer in among the others.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Malformed` if any text fails to decode, there are
    /// no incorrect answers, or two answers decode to the same text.
    pub fn normalize(self, rng: &mut dyn DeterministicRng) -> Result<Question, SourceError> {
        let prompt = decode(&self.question)?;
        let correct = decode(&self.correct_answer)?;
        let mut choices = Vec::with_capacity(self.incorrect_answers.len() + 1);
        for answer in &self.incorrect_answers {
            choices.push(decode(answer)?);
        }
        choices.push(correct.clone());

        shuffle(&mut choices, rng);

        let correct_index = choices
            .iter()
            .position(|choice| *choice == correct)
            .ok_or_else(|| SourceError::Malformed("correct answer lost while shuffling".to_owned()))?;

        Question::new(prompt, choices, correct_index)
            .map_err(|e| SourceError::Malformed(format!("invalid question {:?}: {e}", self.question)))
    }
}

fn decode(text: &str) -> Result<String, SourceError> {
    urlencoding::decode(text)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| SourceError::Malformed(format!("cannot decode {text:?}: {e}")))
}
