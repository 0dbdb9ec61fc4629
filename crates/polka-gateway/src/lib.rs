//! PolkaAgents gateway HTTP API
//!
//! REST surface for the agent marketplace. Owns the in-process dev node
//! (market + ledger) and the dispatcher that forwards paid queries to the
//! per-kind agent workers.
//!
//! # API Structure
//!
//! ```text
//! /health                            - liveness
//! /status                            - market, ledger, worker reachability
//! /agents                            - list, register
//! /agents/:id                        - fetch, update
//! /agents/:id/withdraw               - stake withdrawal
//! /agents/:id/interactions           - per-agent history
//! /query                             - paid query submission
//! /responses                         - response callback
//! /interactions/:id                  - interaction lookup
//! /accounts/:address/balance         - ledger balance
//! /accounts/:address/interactions    - per-wallet history
//! /events                            - recent market events
//! ```

pub mod dispatch;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use dispatch::{DispatchError, Dispatcher, WorkerProbe, WorkerRoutes};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Create the gateway router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = routes::gateway_routes().with_state(state);

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http());
    }

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Create a minimal router for testing
pub fn create_test_router(state: Arc<AppState>) -> Router {
    routes::gateway_routes().with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_tracing);
    }
}
