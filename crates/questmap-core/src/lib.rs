//! Questmap Core — shared domain types and abstractions.
//!
//! This crate defines the zone catalog, normalized questions, the question
//! source contract, scoring rules and the error taxonomy that every other
//! crate depends on. It contains no infrastructure code.

pub mod error;
pub mod event;
pub mod question;
pub mod rng;
pub mod rules;
pub mod source;
pub mod zone;
