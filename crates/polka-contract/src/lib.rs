//! PolkaAgents Contract - marketplace bookkeeping over the ledger
//!
//! `AgentMarket` implements the observable semantics of the on-chain
//! marketplace: agent registration with staking, pay-per-query interactions
//! with a platform fee split, response submission, and per-user/per-agent
//! interaction indices. `DevNode` bundles a market with a fresh ledger,
//! applies dev genesis (endow the owner, register the five catalog agents),
//! and hands out faucet grants so any wallet can pay for queries.

pub mod market;
pub mod node;

pub use market::{AgentMarket, MarketEvent, MarketStats, RecordedEvent, MIN_STAKE};
pub use node::{DevNode, NodeConfig, DEFAULT_PLATFORM_FEE_PCT, FAUCET_GRANT, OWNER_ENDOWMENT};
