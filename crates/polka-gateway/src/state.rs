//! Application state shared across handlers

use std::time::Instant;

use polka_contract::{AgentMarket, DevNode};
use polka_ledger::Ledger;

use crate::dispatch::Dispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// In-process dev node: market semantics plus the backing ledger
    node: DevNode,
    /// Upstream worker dispatcher
    dispatcher: Dispatcher,
    /// Gateway start time, for uptime reporting
    started_at: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(node: DevNode, dispatcher: Dispatcher) -> Self {
        Self {
            node,
            dispatcher,
            started_at: Instant::now(),
        }
    }

    pub fn node(&self) -> &DevNode {
        &self.node
    }

    pub fn market(&self) -> &AgentMarket {
        self.node.market()
    }

    pub fn ledger(&self) -> &Ledger {
        self.node.ledger()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
