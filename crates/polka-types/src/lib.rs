//! PolkaAgents Types - Canonical domain types for the agent marketplace
//!
//! This crate contains the foundational types shared by every other polka
//! crate, with zero dependencies on the rest of the workspace:
//!
//! - Identity types (AgentId, InteractionId, AccountId)
//! - Planck-denominated balances with DOT formatting
//! - Agent registry and query interaction types
//! - The static five-agent catalog (names, models, worker ports)
//! - Marketplace error types

pub mod identity;
pub mod balance;
pub mod agent;
pub mod interaction;
pub mod catalog;
pub mod text;
pub mod error;

pub use identity::*;
pub use balance::*;
pub use agent::*;
pub use interaction::*;
pub use catalog::*;
pub use text::*;
pub use error::*;

/// Version of the PolkaAgents types schema
pub const TYPES_VERSION: &str = "0.1.0";
