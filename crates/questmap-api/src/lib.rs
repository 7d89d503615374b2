//! Questmap HTTP API: configuration, error mapping and routes.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
