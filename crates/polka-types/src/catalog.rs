//! The static agent catalog
//!
//! The deployment ships five agents. Each entry carries the registry
//! metadata the dev node seeds at genesis and the default port its worker
//! process listens on.

use crate::{AgentKind, AgentMetadata, Balance};

/// Port the gateway listens on
pub const GATEWAY_PORT: u16 = 8000;

/// Default per-query price for seeded agents (0.1 DOT)
pub const DEFAULT_PRICE_PER_QUERY: Balance = Balance::from_plancks(1_000_000_000);

/// Default registration stake for seeded agents (1 DOT)
pub const DEFAULT_STAKE: Balance = Balance::from_plancks(10_000_000_000);

/// One seeded agent: registry metadata plus its worker's default port
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub kind: AgentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub model_info: &'static str,
    pub port: u16,
}

impl CatalogEntry {
    /// Build the registry metadata seeded for this agent
    pub fn metadata(&self) -> AgentMetadata {
        AgentMetadata::new(self.name, self.description, self.kind, self.model_info)
    }
}

/// The five deployed agents, in registration order
pub const CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        kind: AgentKind::Chatbot,
        name: "ChatBot AI",
        description: "General purpose chatbot for answering questions",
        model_info: "Using GPT-2 Large for offline text generation",
        port: 8001,
    },
    CatalogEntry {
        kind: AgentKind::Translation,
        name: "TranslateGPT",
        description: "Translation service supporting multiple languages",
        model_info: "Using MarianMT models for offline translation",
        port: 8002,
    },
    CatalogEntry {
        kind: AgentKind::Sentiment,
        name: "SentimentAnalyzer",
        description: "Analyze the sentiment of text as positive, negative, or neutral",
        model_info: "Using BERT-Large for sentiment classification",
        port: 8003,
    },
    CatalogEntry {
        kind: AgentKind::Summarization,
        name: "TextSummarizer",
        description: "Create concise summaries of long texts",
        model_info: "Using T5-Base for text summarization",
        port: 8004,
    },
    CatalogEntry {
        kind: AgentKind::JobApplication,
        name: "JobApplicationWriter",
        description: "Generate professional cover letters from resumes and job descriptions",
        model_info: "Using fine-tuned GPT-2 for job application writing",
        port: 8005,
    },
];

/// Look up the catalog entry for an agent kind
pub fn catalog_entry(kind: AgentKind) -> &'static CatalogEntry {
    match kind {
        AgentKind::Chatbot => &CATALOG[0],
        AgentKind::Translation => &CATALOG[1],
        AgentKind::Sentiment => &CATALOG[2],
        AgentKind::Summarization => &CATALOG[3],
        AgentKind::JobApplication => &CATALOG[4],
    }
}

/// Default worker port for an agent kind
pub fn default_worker_port(kind: AgentKind) -> u16 {
    catalog_entry(kind).port
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_kind_in_order() {
        assert_eq!(CATALOG.len(), AgentKind::ALL.len());
        for (entry, kind) in CATALOG.iter().zip(AgentKind::ALL) {
            assert_eq!(entry.kind, kind);
            assert_eq!(catalog_entry(kind).name, entry.name);
        }
    }

    #[test]
    fn test_worker_ports_follow_the_gateway() {
        let ports: Vec<u16> = CATALOG.iter().map(|e| e.port).collect();
        assert_eq!(ports, vec![8001, 8002, 8003, 8004, 8005]);
        assert_eq!(GATEWAY_PORT, 8000);
    }

    #[test]
    fn test_seeded_defaults() {
        assert_eq!(DEFAULT_PRICE_PER_QUERY.format_dot(), "0.1000 DOT");
        assert_eq!(DEFAULT_STAKE.format_dot(), "1.0000 DOT");
    }

    #[test]
    fn test_metadata_carries_catalog_fields() {
        let meta = catalog_entry(AgentKind::Translation).metadata();
        assert_eq!(meta.name, "TranslateGPT");
        assert_eq!(meta.kind, AgentKind::Translation);
        assert!(meta.model_info.contains("MarianMT"));
    }
}
