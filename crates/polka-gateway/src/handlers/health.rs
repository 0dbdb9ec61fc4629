//! Health and status handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polka_contract::MarketStats;
use polka_types::Balance;

use crate::dispatch::WorkerProbe;
use crate::state::AppState;

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp (epoch seconds)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

/// Ledger aggregate counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStatus {
    /// Known accounts
    pub accounts: usize,
    /// Recorded entries
    pub entries: usize,
    /// Sum of all balances in plancks
    pub total_balance: Balance,
    /// Sum rendered as DOT
    pub total_balance_display: String,
}

/// Full gateway status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Backing node URL
    pub node_url: String,
    /// Marketplace contract address
    pub contract_address: String,
    /// Market counters
    pub market: MarketStats,
    /// Ledger counters
    pub ledger: LedgerStatus,
    /// Worker reachability, freshly probed
    pub workers: Vec<WorkerProbe>,
}

/// Liveness check
///
/// Returns 200 if the gateway is running. Does not probe workers.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Full status: market and ledger counters plus worker reachability
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let market = state.market().stats().await;
    let workers = state.dispatcher().probe_all().await;

    let total_balance = state.ledger().total_balance().await;
    let ledger = LedgerStatus {
        accounts: state.ledger().all_accounts().await.len(),
        entries: state.ledger().entry_count().await,
        total_balance,
        total_balance_display: total_balance.format_dot(),
    };

    let config = state.node().config();
    Json(StatusResponse {
        name: "PolkaAgents Gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        node_url: config.node_url.clone(),
        contract_address: config.contract_address.clone(),
        market,
        ledger,
        workers,
    })
}
