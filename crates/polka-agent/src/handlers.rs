//! Worker HTTP handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use polka_types::AgentKind;

use crate::error::WorkerResult;
use crate::state::WorkerState;

/// Prediction request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub input: String,
}

/// Prediction response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub result: String,
    pub agent: AgentKind,
    pub elapsed_ms: u64,
}

/// Worker health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerHealth {
    pub status: String,
    #[serde(rename = "agent_type")]
    pub kind: AgentKind,
    pub name: String,
    pub model_info: String,
    pub engine_ready: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

/// `GET /` ready banner
pub async fn ready_banner(State(state): State<Arc<WorkerState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("{} Agent Ready", state.kind())
    }))
}

/// `GET /health` worker identity and engine readiness
pub async fn health(State(state): State<Arc<WorkerState>>) -> Json<WorkerHealth> {
    let engine_ready = state.engine().ready().await;
    let status = if engine_ready { "healthy" } else { "degraded" };
    Json(WorkerHealth {
        status: status.to_string(),
        kind: state.kind(),
        name: state.catalog_entry().name.to_string(),
        model_info: state.engine().model_info().to_string(),
        engine_ready,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /predict` run one inference, measuring latency
pub async fn predict(
    State(state): State<Arc<WorkerState>>,
    Json(request): Json<PredictRequest>,
) -> WorkerResult<Json<PredictResponse>> {
    let started = Instant::now();
    let result = state.engine().infer(&request.input).await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        agent = %state.kind(),
        input_chars = request.input.len(),
        elapsed_ms,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        result,
        agent: state.kind(),
        elapsed_ms,
    }))
}
