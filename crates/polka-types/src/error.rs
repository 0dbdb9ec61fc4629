//! Error types for the PolkaAgents marketplace

use crate::{AccountId, AgentId, Balance, InteractionId};
use thiserror::Error;

/// Result type for marketplace operations
pub type MarketResult<T> = std::result::Result<T, MarketError>;

/// Marketplace error types
#[derive(Debug, Clone, Error)]
pub enum MarketError {
    // ========================================================================
    // Registry Errors
    // ========================================================================

    /// Agent not found
    #[error("Agent {agent_id} not found")]
    AgentNotFound { agent_id: AgentId },

    /// Agent registered but deactivated
    #[error("Agent {agent_id} is not active")]
    AgentNotActive { agent_id: AgentId },

    /// Caller does not own the agent
    #[error("Account {account} does not own agent {agent_id}")]
    UnauthorizedOwner { account: AccountId, agent_id: AgentId },

    /// Caller is not the platform operator
    #[error("Account {account} is not the platform operator")]
    UnauthorizedPlatform { account: AccountId },

    /// Unrecognized agent kind string
    #[error("Unknown agent kind: {kind}")]
    UnknownAgentKind { kind: String },

    // ========================================================================
    // Payment Errors
    // ========================================================================

    /// Payment below the agent's listed price
    #[error("Insufficient payment for agent {agent_id}: offered {offered}, price {price}")]
    InsufficientPayment {
        agent_id: AgentId,
        offered: Balance,
        price: Balance,
    },

    /// Registration stake below the market minimum
    #[error("Stake {offered} is below the minimum {minimum}")]
    InsufficientStake { offered: Balance, minimum: Balance },

    /// Platform fee percentage above 100
    #[error("Platform fee percentage {pct} exceeds 100")]
    InvalidFeePercentage { pct: u8 },

    // ========================================================================
    // Interaction Errors
    // ========================================================================

    /// Interaction not found
    #[error("Interaction {interaction_id} not found")]
    InteractionNotFound { interaction_id: InteractionId },

    // ========================================================================
    // Ledger Errors
    // ========================================================================

    /// Account has no ledger entry
    #[error("Account {account} not found in the ledger")]
    AccountNotFound { account: AccountId },

    /// Debit larger than the available balance
    #[error("Insufficient balance in {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        requested: Balance,
        available: Balance,
    },

    /// Balance overflow during arithmetic
    #[error("Balance overflow during arithmetic operation")]
    BalanceOverflow,

    /// Balance underflow during arithmetic
    #[error("Balance underflow during arithmetic operation")]
    BalanceUnderflow,

    /// Zero-amount movements are not recorded
    #[error("Zero amount movements are not recorded")]
    ZeroAmount,

    // ========================================================================
    // Input Errors
    // ========================================================================

    /// Malformed account address
    #[error("Invalid account address: {address:?}")]
    InvalidAccount { address: String },
}

impl MarketError {
    /// Get a stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AgentNotFound { .. } => "AGENT_NOT_FOUND",
            Self::AgentNotActive { .. } => "AGENT_NOT_ACTIVE",
            Self::UnauthorizedOwner { .. } => "UNAUTHORIZED_OWNER",
            Self::UnauthorizedPlatform { .. } => "UNAUTHORIZED_PLATFORM",
            Self::UnknownAgentKind { .. } => "UNKNOWN_AGENT_KIND",
            Self::InsufficientPayment { .. } => "INSUFFICIENT_PAYMENT",
            Self::InsufficientStake { .. } => "INSUFFICIENT_STAKE",
            Self::InvalidFeePercentage { .. } => "INVALID_FEE_PERCENTAGE",
            Self::InteractionNotFound { .. } => "INTERACTION_NOT_FOUND",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BalanceOverflow => "BALANCE_OVERFLOW",
            Self::BalanceUnderflow => "BALANCE_UNDERFLOW",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::InvalidAccount { .. } => "INVALID_ACCOUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MarketError::AgentNotFound {
            agent_id: AgentId::new(9),
        };
        assert_eq!(err.error_code(), "AGENT_NOT_FOUND");
        assert_eq!(err.to_string(), "Agent 9 not found");
    }

    #[test]
    fn test_insufficient_balance_renders_dot() {
        let err = MarketError::InsufficientBalance {
            account: AccountId::dev_owner(),
            requested: Balance::from_dot(2),
            available: Balance::from_dot(1),
        };
        assert!(err.to_string().contains("2.0000 DOT"));
        assert!(err.to_string().contains("1.0000 DOT"));
    }
}
