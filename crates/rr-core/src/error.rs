//! # AppError
//!
//! Centralized error handling for the Rusty-Rig ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all rr-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Component, Preset, Post, Reply)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank post title, unknown category)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure (e.g., record store unreadable, DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl Into<String>) -> Self {
        Self::NotFound(kind.to_string(), id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line.
        Self::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for Rusty-Rig logic.
pub type Result<T> = std::result::Result<T, AppError>;
