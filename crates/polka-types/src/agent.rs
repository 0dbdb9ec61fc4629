//! Agent registry types

use crate::error::MarketError;
use crate::{AccountId, AgentId, Balance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five agent families the marketplace serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Chatbot,
    Translation,
    Sentiment,
    Summarization,
    JobApplication,
}

impl AgentKind {
    /// All kinds, in catalog order
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Chatbot,
        AgentKind::Translation,
        AgentKind::Sentiment,
        AgentKind::Summarization,
        AgentKind::JobApplication,
    ];

    /// Wire identifier (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chatbot => "chatbot",
            Self::Translation => "translation",
            Self::Sentiment => "sentiment",
            Self::Summarization => "summarization",
            Self::JobApplication => "job_application",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chatbot" => Ok(Self::Chatbot),
            "translation" => Ok(Self::Translation),
            "sentiment" => Ok(Self::Sentiment),
            "summarization" => Ok(Self::Summarization),
            "job_application" => Ok(Self::JobApplication),
            other => Err(MarketError::UnknownAgentKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Descriptive metadata attached to a registered agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub name: String,
    pub description: String,
    #[serde(rename = "agent_type")]
    pub kind: AgentKind,
    pub model_info: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl AgentMetadata {
    /// Create metadata with the default schema version
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: AgentKind,
        model_info: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            model_info: model_info.into(),
            version: default_version(),
        }
    }
}

/// A registered agent as stored by the market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub owner: AccountId,
    pub metadata: AgentMetadata,
    pub price_per_query: Balance,
    pub stake_amount: Balance,
    pub active: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_form_is_snake_case() {
        let json = serde_json::to_string(&AgentKind::JobApplication).unwrap();
        assert_eq!(json, "\"job_application\"");
        let parsed: AgentKind = serde_json::from_str("\"sentiment\"").unwrap();
        assert_eq!(parsed, AgentKind::Sentiment);
    }

    #[test]
    fn test_kind_from_str_round_trip() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
        assert!("paralegal".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_metadata_kind_serializes_as_agent_type() {
        let meta = AgentMetadata::new("ChatBot AI", "desc", AgentKind::Chatbot, "GPT-2");
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["agent_type"], "chatbot");
        assert_eq!(value["version"], "1.0.0");
    }

    #[test]
    fn test_metadata_version_defaults_on_deserialize() {
        let meta: AgentMetadata = serde_json::from_str(
            r#"{"name":"a","description":"b","agent_type":"chatbot","model_info":"c"}"#,
        )
        .unwrap();
        assert_eq!(meta.version, "1.0.0");
    }
}
