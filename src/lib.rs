//! Library crate for trivia-live-back, exposing modules for binaries and integration tests.

/// Runtime configuration loading.
pub mod config;
/// Persistence abstractions and backends.
pub mod dao;
/// Request, response, and event payload shapes.
pub mod dto;
/// Service and HTTP error taxonomy.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Business logic services.
pub mod services;
/// Shared application state.
pub mod state;
