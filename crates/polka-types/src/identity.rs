//! Identity types for PolkaAgents
//!
//! Agent and interaction ids are sequential integers handed out by the
//! market counters, starting at 1, so an id of 0 never refers to a stored
//! record. Account ids are SS58-formatted address strings.

use crate::error::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate sequential ID types with common implementations
macro_rules! define_seq_id {
    ($name:ident, $raw:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $raw);

        impl $name {
            /// First id handed out by the market counter
            pub const FIRST: Self = Self(1);

            /// Wrap a raw id value
            pub fn new(raw: $raw) -> Self {
                Self(raw)
            }

            /// Get the raw id value
            pub fn value(&self) -> $raw {
                self.0
            }

            /// The id that follows this one
            pub fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                Self(raw)
            }
        }
    };
}

define_seq_id!(AgentId, u32, "Unique identifier for a registered agent");
define_seq_id!(InteractionId, u64, "Unique identifier for a paid query interaction");

/// Development owner account, holder of the seeded catalog agents
pub const DEV_OWNER: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

/// Default address of the deployed marketplace contract
pub const DEFAULT_CONTRACT_ADDRESS: &str = "5CiPPseXPECbkjWCa6MnjNokrgYjMqmKndv2rSnekmSK2DjL";

/// An SS58-formatted account address.
///
/// Addresses are opaque to this system; validation only rejects values that
/// cannot possibly be addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Parse an address string, rejecting empty or whitespace-bearing input
    pub fn parse(s: impl Into<String>) -> Result<Self, MarketError> {
        let s = s.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(MarketError::InvalidAccount { address: s });
        }
        Ok(Self(s))
    }

    /// The dev-mode owner account
    pub fn dev_owner() -> Self {
        Self(DEV_OWNER.to_string())
    }

    /// Get the address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        assert_eq!(AgentId::FIRST.value(), 1);
        assert_eq!(InteractionId::FIRST.value(), 1);
    }

    #[test]
    fn test_id_next_increments() {
        let id = AgentId::new(41);
        assert_eq!(id.next(), AgentId::new(42));
    }

    #[test]
    fn test_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&InteractionId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_account_parse_accepts_ss58() {
        let account = AccountId::parse(DEV_OWNER).unwrap();
        assert_eq!(account.as_str(), DEV_OWNER);
    }

    #[test]
    fn test_account_parse_rejects_empty_and_whitespace() {
        assert!(AccountId::parse("").is_err());
        assert!(AccountId::parse("5Grw vaEF").is_err());
        assert!(AccountId::parse("addr\n").is_err());
    }
}
