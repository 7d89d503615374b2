//! Questmap Trivia — Open Trivia Database question source.
//!
//! Fetches multiple-choice questions over HTTP, decodes the provider's
//! RFC 3986 URL encoding and shuffles each question's answers before handing
//! normalized [`Question`](questmap_core::question::Question)s to the engine.

pub mod client;
pub mod response;

pub use client::{OpenTriviaConfig, OpenTriviaSource};
