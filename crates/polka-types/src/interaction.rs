//! Query interaction types

use crate::{AccountId, AgentId, Balance, InteractionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a paid query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    /// Fee collected, awaiting the agent's response
    Pending,
    /// Response recorded by the agent owner
    Completed,
    /// The agent could not produce a response
    Failed,
}

impl InteractionStatus {
    /// Wire identifier (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the interaction is still awaiting a response
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paid query and its (eventual) response, as stored by the market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub agent_id: AgentId,
    pub user: AccountId,
    pub query: String,
    pub response: Option<String>,
    pub status: InteractionStatus,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub fee_paid: Balance,
}
