//! HTTP surface shared by the per-kind agent worker daemons.
//!
//! Every worker serves the same three routes:
//!
//! - `GET /` ready banner
//! - `GET /health` identity and engine readiness
//! - `POST /predict` run one inference
//!
//! `polka-agentd` pairs this router with an engine picked at startup.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ErrorBody, WorkerError, WorkerResult};
pub use handlers::{PredictRequest, PredictResponse, WorkerHealth};
pub use state::WorkerState;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the worker router around shared state.
pub fn create_router(state: Arc<WorkerState>) -> Router {
    Router::new()
        .route("/", get(handlers::ready_banner))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use polka_engines::builtin_engine;
    use polka_types::AgentKind;

    fn test_server(kind: AgentKind) -> TestServer {
        let state = Arc::new(WorkerState::new(builtin_engine(kind)));
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_ready_banner_names_the_kind() {
        let server = test_server(AgentKind::Chatbot);

        let response = server.get("/").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "chatbot Agent Ready");
    }

    #[tokio::test]
    async fn test_health_reports_engine() {
        let server = test_server(AgentKind::Sentiment);

        let response = server.get("/health").await;
        response.assert_status_ok();

        let health: WorkerHealth = response.json();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.kind, AgentKind::Sentiment);
        assert_eq!(health.name, "SentimentAnalyzer");
        assert!(health.engine_ready);
    }

    #[tokio::test]
    async fn test_predict_returns_result_and_latency() {
        let server = test_server(AgentKind::Chatbot);

        let response = server
            .post("/predict")
            .json(&PredictRequest {
                input: "Hello there".to_string(),
            })
            .await;
        response.assert_status_ok();

        let body: PredictResponse = response.json();
        assert_eq!(body.agent, AgentKind::Chatbot);
        assert!(body.result.contains("chatbot agent"));
    }

    #[tokio::test]
    async fn test_predict_empty_input_is_guidance_not_error() {
        let server = test_server(AgentKind::Summarization);

        let response = server
            .post("/predict")
            .json(&PredictRequest {
                input: String::new(),
            })
            .await;
        response.assert_status_ok();

        let body: PredictResponse = response.json();
        assert!(!body.result.is_empty());
    }

    #[tokio::test]
    async fn test_predict_translates_directive() {
        let server = test_server(AgentKind::Translation);

        let response = server
            .post("/predict")
            .json(&PredictRequest {
                input: "Translate from English to Spanish: hello".to_string(),
            })
            .await;
        response.assert_status_ok();

        let body: PredictResponse = response.json();
        assert!(body.result.contains("hola"));
    }
}
