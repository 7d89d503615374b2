//! Shared test mocks and fixtures for the Questmap trivia game engine.

mod fixtures;
mod rng;
mod source;

pub use fixtures::{FixedClock, catalog, question, questions};
pub use rng::{LowestPickRng, ScriptedPickRng};
pub use source::{GatedQuestionSource, ScriptedQuestionSource};
