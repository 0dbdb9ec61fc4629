//! Query flow DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polka_types::{AccountId, AgentId, Balance, Interaction, InteractionId, InteractionStatus};

/// Seconds a caller should expect to wait before polling the interaction
pub const ESTIMATED_RESPONSE_SECS: u64 = 5;

/// Submit a query to an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Target agent
    pub agent_id: AgentId,
    /// Query text
    pub query: String,
    /// Paying wallet address
    pub wallet_address: String,
}

/// Accepted query acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Interaction recorded for this query
    pub interaction_id: InteractionId,
    /// Always `pending` at accept time
    pub status: InteractionStatus,
    /// Estimated seconds until the response lands
    pub estimated_time: u64,
}

impl QueryResponse {
    /// Acknowledgement for a freshly accepted query
    pub fn pending(interaction_id: InteractionId) -> Self {
        Self {
            interaction_id,
            status: InteractionStatus::Pending,
            estimated_time: ESTIMATED_RESPONSE_SECS,
        }
    }
}

/// Record an agent's response to a pending interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponseRequest {
    /// Interaction being answered
    pub interaction_id: InteractionId,
    /// Response text
    pub response_data: String,
    /// Agent that produced the response
    pub agent_id: AgentId,
}

/// Interaction as served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionView {
    /// Interaction id
    pub interaction_id: InteractionId,
    /// Agent that was queried
    pub agent_id: AgentId,
    /// Paying wallet address
    pub wallet_address: AccountId,
    /// Query text
    pub query: String,
    /// Response text, once completed
    pub response: Option<String>,
    /// Current status
    pub status: InteractionStatus,
    /// When the query was accepted (epoch seconds on the wire)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Fee paid in plancks
    pub fee_paid: Balance,
}

impl From<Interaction> for InteractionView {
    fn from(interaction: Interaction) -> Self {
        Self {
            interaction_id: interaction.id,
            agent_id: interaction.agent_id,
            wallet_address: interaction.user,
            query: interaction.query,
            response: interaction.response,
            status: interaction.status,
            timestamp: interaction.created_at,
            fee_paid: interaction.fee_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_ack_wire_form() {
        let ack = QueryResponse::pending(InteractionId::new(3));
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["interaction_id"], 3);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["estimated_time"], 5);
    }

    #[test]
    fn test_interaction_view_renames_fields() {
        let interaction = Interaction {
            id: InteractionId::new(11),
            agent_id: AgentId::new(2),
            user: AccountId::dev_owner(),
            query: "What is Polkadot?".to_string(),
            response: None,
            status: InteractionStatus::Pending,
            created_at: Utc::now(),
            fee_paid: Balance::from_dot(1),
        };

        let view = InteractionView::from(interaction);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["interaction_id"], 11);
        assert!(json["wallet_address"].is_string());
        assert!(json["timestamp"].is_i64());
        assert!(json.get("user").is_none());
        assert!(json.get("created_at").is_none());
    }
}
