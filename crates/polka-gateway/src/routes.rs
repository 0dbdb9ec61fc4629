//! Gateway routes
//!
//! Route definitions for all gateway endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create all gateway routes
pub fn gateway_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health and status
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::health::status))
        // Agent registry
        .route("/agents", get(handlers::agents::list_agents))
        .route("/agents", post(handlers::agents::register_agent))
        .route("/agents/:id", get(handlers::agents::get_agent))
        .route("/agents/:id", patch(handlers::agents::update_agent))
        .route("/agents/:id/withdraw", post(handlers::agents::withdraw_stake))
        .route(
            "/agents/:id/interactions",
            get(handlers::agents::agent_interactions),
        )
        // Query flow
        .route("/query", post(handlers::queries::submit_query))
        .route("/responses", post(handlers::queries::submit_response))
        .route("/interactions/:id", get(handlers::queries::get_interaction))
        // Account views
        .route(
            "/accounts/:address/balance",
            get(handlers::accounts::get_balance),
        )
        .route(
            "/accounts/:address/interactions",
            get(handlers::accounts::account_interactions),
        )
        // Event feed
        .route("/events", get(handlers::events::recent_events))
}
