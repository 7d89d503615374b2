//! Questmap game engine.
//!
//! Owns the question cache, quiz sessions, zone progression and the game
//! facade that composes them into the actions presentation code calls.

pub mod application;
pub mod domain;

pub use application::cache::QuestionCache;
pub use application::game::Game;
pub use application::view::{GameView, QuestionView, QuizView};
pub use domain::session::AnswerOutcome;
pub use domain::state::{GamePhase, QuizStarted};
pub use domain::tracker::ZoneOutcome;
