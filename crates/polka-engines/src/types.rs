//! Engine error types

use thiserror::Error;

/// Errors surfaced by inference engines
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Upstream request failed: {message}")]
    Upstream { message: String },

    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
