//! Agent management DTOs

use serde::{Deserialize, Serialize};

use polka_types::{AgentId, AgentMetadata, AgentRecord, Balance};

/// Register a new agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAgentRequest {
    /// Owner wallet address
    pub owner: String,
    /// Agent metadata
    pub metadata: AgentMetadata,
    /// Price per query in plancks
    pub price_per_query: Balance,
    /// Registration stake in plancks
    pub stake_amount: Balance,
}

/// Partially update an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    /// Owner wallet address (authorizes the update)
    pub owner: String,
    /// New metadata, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AgentMetadata>,
    /// New price per query, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_query: Option<Balance>,
    /// New active flag, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Withdraw an agent's stake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Owner wallet address (authorizes the withdrawal)
    pub owner: String,
}

/// Stake withdrawal outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    /// Agent whose stake was refunded
    pub agent_id: AgentId,
    /// Refunded amount in plancks
    pub refunded: Balance,
}

/// Agent list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListResponse {
    /// Registered agents
    pub agents: Vec<AgentRecord>,
}
