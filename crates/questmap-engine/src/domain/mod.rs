//! Domain layer: quiz sessions, zone progression and the game state machine.

pub mod events;
pub mod session;
pub mod state;
pub mod tracker;
