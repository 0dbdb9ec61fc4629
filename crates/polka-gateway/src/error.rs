//! Gateway error handling
//!
//! Maps marketplace errors onto HTTP statuses with a stable JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use polka_types::MarketError;

/// Gateway result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Get the stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Market(err) => err.error_code(),
            Self::BadRequest(_) => "BAD_REQUEST",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Market(err) => match err {
                // 404 Not Found
                MarketError::AgentNotFound { .. }
                | MarketError::InteractionNotFound { .. }
                | MarketError::AccountNotFound { .. } => StatusCode::NOT_FOUND,

                // 403 Forbidden
                MarketError::UnauthorizedOwner { .. }
                | MarketError::UnauthorizedPlatform { .. } => StatusCode::FORBIDDEN,

                // 422 Unprocessable Entity
                MarketError::AgentNotActive { .. }
                | MarketError::InsufficientPayment { .. }
                | MarketError::InsufficientStake { .. }
                | MarketError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,

                // 400 Bad Request
                MarketError::UnknownAgentKind { .. }
                | MarketError::InvalidFeePercentage { .. }
                | MarketError::InvalidAccount { .. }
                | MarketError::ZeroAmount => StatusCode::BAD_REQUEST,

                // 500 Internal Server Error
                MarketError::BalanceOverflow | MarketError::BalanceUnderflow => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polka_types::{AgentId, Balance};

    #[test]
    fn test_error_codes() {
        let err = ApiError::from(MarketError::AgentNotFound {
            agent_id: AgentId::new(7),
        });
        assert_eq!(err.error_code(), "AGENT_NOT_FOUND");
        assert_eq!(ApiError::BadRequest("nope".to_string()).error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_status_codes() {
        let not_found = ApiError::from(MarketError::AgentNotFound {
            agent_id: AgentId::new(1),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let underpaid = ApiError::from(MarketError::InsufficientPayment {
            agent_id: AgentId::new(1),
            offered: Balance::ZERO,
            price: Balance::from_dot(1),
        });
        assert_eq!(underpaid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad_fee = ApiError::from(MarketError::InvalidFeePercentage { pct: 150 });
        assert_eq!(bad_fee.status_code(), StatusCode::BAD_REQUEST);

        let overflow = ApiError::from(MarketError::BalanceOverflow);
        assert_eq!(overflow.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
