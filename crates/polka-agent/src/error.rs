//! Worker error handling
//!
//! Input-shaped outcomes (guidance messages for empty or unparseable input)
//! are successful predictions and never reach this module. Only engine
//! transport failures become HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polka_engines::EngineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Worker result type
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors surfaced by the worker's HTTP layer
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The engine could not produce a prediction
    #[error("Inference failed: {0}")]
    Engine(#[from] EngineError),
}

impl WorkerError {
    /// Stable error code for API payloads
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Engine(EngineError::Upstream { .. }) => "ENGINE_UPSTREAM",
            Self::Engine(EngineError::InvalidResponse { .. }) => "ENGINE_INVALID_RESPONSE",
        }
    }

    /// HTTP status for the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // The builtin engines never fail; these come from a model server
            Self::Engine(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Error payload returned by the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failures_map_to_bad_gateway() {
        let err = WorkerError::Engine(EngineError::Upstream {
            message: "connection refused".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "ENGINE_UPSTREAM");
        assert!(err.to_string().contains("connection refused"));
    }
}
