//! Ledger and event DTOs

use serde::{Deserialize, Serialize};

use polka_contract::RecordedEvent;
use polka_types::Balance;

/// Account balance view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Wallet address
    pub address: String,
    /// Balance in plancks
    pub balance: Balance,
    /// Balance rendered as DOT
    pub balance_display: String,
}

impl BalanceResponse {
    pub fn new(address: String, balance: Balance) -> Self {
        let balance_display = balance.format_dot();
        Self {
            address,
            balance,
            balance_display,
        }
    }
}

/// Recent market events envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    /// Most recent events, newest first
    pub events: Vec<RecordedEvent>,
}
