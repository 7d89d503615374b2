//! Application layer: the question cache, the game facade and its read model.

pub mod cache;
pub mod game;
pub mod view;
