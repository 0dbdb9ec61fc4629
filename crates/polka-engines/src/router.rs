//! Engine selection
//!
//! Workers default to the builtin deterministic engines, which need no
//! model weights or network access. Setting `POLKA_ENGINE=remote` forwards
//! inference to the model server named by `POLKA_MODEL_SERVER_URL` instead.

use std::sync::Arc;

use polka_types::AgentKind;

use crate::engines::{
    ChatbotEngine, Engine, JobApplicationEngine, RemoteEngine, RemoteEngineConfig,
    SentimentEngine, SummarizationEngine, TranslationEngine,
};

/// Build the builtin deterministic engine for an agent kind
pub fn builtin_engine(kind: AgentKind) -> Arc<dyn Engine> {
    match kind {
        AgentKind::Chatbot => Arc::new(ChatbotEngine::new()),
        AgentKind::Translation => Arc::new(TranslationEngine::new()),
        AgentKind::Sentiment => Arc::new(SentimentEngine::new()),
        AgentKind::Summarization => Arc::new(SummarizationEngine::new()),
        AgentKind::JobApplication => Arc::new(JobApplicationEngine::new()),
    }
}

/// Select an engine from the environment
///
/// Reads `POLKA_ENGINE`:
/// - `builtin` (default): deterministic engines
/// - `remote`: forward to the model server at `POLKA_MODEL_SERVER_URL`
pub fn engine_from_env(kind: AgentKind) -> Arc<dyn Engine> {
    // Try to load .env file (ignore errors)
    let _ = dotenvy::dotenv();

    let selection = std::env::var("POLKA_ENGINE").unwrap_or_else(|_| "builtin".to_string());

    match selection.trim().to_lowercase().as_str() {
        "remote" => match std::env::var("POLKA_MODEL_SERVER_URL") {
            Ok(url) if !url.trim().is_empty() => Arc::new(RemoteEngine::new(
                kind,
                RemoteEngineConfig {
                    base_url: url,
                    ..RemoteEngineConfig::default()
                },
            )),
            _ => {
                tracing::warn!("POLKA_MODEL_SERVER_URL not set, using builtin engine");
                builtin_engine(kind)
            }
        },
        "builtin" => builtin_engine(kind),
        other => {
            tracing::warn!("Unknown engine selection '{}', using builtin engine", other);
            builtin_engine(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_engines_cover_every_kind() {
        for kind in AgentKind::ALL {
            let engine = builtin_engine(kind);
            assert_eq!(engine.kind(), kind);
            assert!(engine.ready().await);
        }
    }

    #[tokio::test]
    async fn test_builtin_engines_produce_output() {
        for kind in AgentKind::ALL {
            let engine = builtin_engine(kind);
            let out = engine.infer("hello").await.unwrap();
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_selection_falls_back_to_builtin() {
        // POLKA_ENGINE is unset in the test environment
        let engine = engine_from_env(AgentKind::Sentiment);
        assert_eq!(engine.kind(), AgentKind::Sentiment);
    }
}
