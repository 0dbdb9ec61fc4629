//! Data Transfer Objects
//!
//! Request and response structures for the gateway API. The wire contract
//! uses `agent_type`, `wallet_address`, and epoch-seconds timestamps.

pub mod agent;
pub mod ledger;
pub mod query;

pub use agent::*;
pub use ledger::*;
pub use query::*;
