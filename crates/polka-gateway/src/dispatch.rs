//! Upstream worker dispatch
//!
//! Routes accepted queries to the per-kind agent workers and settles each
//! interaction through the market once the worker answers or the transport
//! gives up. Reachability probes feed the status endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use polka_types::{default_worker_port, AccountId, AgentKind, InteractionId};

use crate::state::AppState;

/// Upstream call timeout for predictions
const DISPATCH_TIMEOUT_SECS: u64 = 60;

/// Probe timeout for reachability checks
const PROBE_TIMEOUT_SECS: u64 = 2;

/// Routing table: agent kind to worker base URL
#[derive(Debug, Clone)]
pub struct WorkerRoutes {
    urls: HashMap<AgentKind, String>,
}

impl WorkerRoutes {
    /// Routes from the deployment catalog: every kind on its localhost port
    pub fn with_defaults() -> Self {
        let urls = AgentKind::ALL
            .iter()
            .map(|kind| {
                let url = format!("http://localhost:{}", default_worker_port(*kind));
                (*kind, url)
            })
            .collect();
        Self { urls }
    }

    /// Override the base URL for one kind
    pub fn override_url(&mut self, kind: AgentKind, url: impl Into<String>) {
        let url = url.into();
        let trimmed = url.trim_end_matches('/').to_string();
        self.urls.insert(kind, trimmed);
    }

    /// Base URL for one kind
    pub fn url_for(&self, kind: AgentKind) -> String {
        self.urls
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| format!("http://localhost:{}", default_worker_port(kind)))
    }
}

impl Default for WorkerRoutes {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One worker's reachability as last observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerProbe {
    #[serde(rename = "agent_type")]
    pub kind: AgentKind,
    pub url: String,
    pub reachable: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub checked_at: DateTime<Utc>,
}

/// Why an upstream dispatch failed
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{kind} worker unreachable: {message}")]
    Unreachable { kind: AgentKind, message: String },

    #[error("{kind} worker rejected the query: {message}")]
    Rejected { kind: AgentKind, message: String },
}

/// Worker prediction reply body
#[derive(Debug, Deserialize)]
struct PredictReply {
    result: String,
}

/// Dispatches accepted queries to agent workers
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<WorkerRoutes>,
    client: reqwest::Client,
    probes: Arc<DashMap<AgentKind, WorkerProbe>>,
}

impl Dispatcher {
    pub fn new(routes: WorkerRoutes) -> Self {
        Self {
            routes: Arc::new(routes),
            client: reqwest::Client::new(),
            probes: Arc::new(DashMap::new()),
        }
    }

    /// POST one query to the worker for `kind` and return its result text
    pub async fn predict(&self, kind: AgentKind, input: &str) -> Result<String, DispatchError> {
        let url = format!("{}/predict", self.routes.url_for(kind));
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(DISPATCH_TIMEOUT_SECS))
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|err| DispatchError::Unreachable {
                kind,
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                kind,
                message: format!("{status}: {body}"),
            });
        }

        let reply: PredictReply =
            response
                .json()
                .await
                .map_err(|err| DispatchError::Rejected {
                    kind,
                    message: err.to_string(),
                })?;
        Ok(reply.result)
    }

    /// Check one worker's `/health` and cache the outcome
    pub async fn probe(&self, kind: AgentKind) -> WorkerProbe {
        let base = self.routes.url_for(kind);
        let reachable = match self
            .client
            .get(format!("{base}/health"))
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        };

        let probe = WorkerProbe {
            kind,
            url: base,
            reachable,
            checked_at: Utc::now(),
        };
        self.probes.insert(kind, probe.clone());
        probe
    }

    /// Probe every cataloged worker concurrently, in catalog order
    pub async fn probe_all(&self) -> Vec<WorkerProbe> {
        join_all(AgentKind::ALL.iter().map(|kind| self.probe(*kind))).await
    }

    /// Last cached probe for one kind, if any
    pub fn last_probe(&self, kind: AgentKind) -> Option<WorkerProbe> {
        self.probes.get(&kind).map(|entry| entry.value().clone())
    }
}

/// Drive one accepted query to completion
///
/// Settles through the market as the agent's owner: a worker answer
/// completes the interaction, a transport failure fails it.
pub async fn run_dispatch(
    state: Arc<AppState>,
    interaction_id: InteractionId,
    kind: AgentKind,
    owner: AccountId,
    query: String,
) {
    match state.dispatcher().predict(kind, &query).await {
        Ok(result) => {
            info!(%interaction_id, agent = %kind, "worker answered");
            if let Err(err) = state
                .market()
                .submit_response(&owner, interaction_id, result)
                .await
            {
                warn!(%interaction_id, error = %err, "failed to record worker response");
            }
        }
        Err(err) => {
            warn!(%interaction_id, agent = %kind, error = %err, "dispatch failed");
            if let Err(err) = state
                .market()
                .fail_interaction(&owner, interaction_id)
                .await
            {
                warn!(%interaction_id, error = %err, "failed to mark interaction failed");
            }
        }
    }
}

/// Fire-and-forget wrapper around [`run_dispatch`]
pub fn spawn_dispatch(
    state: Arc<AppState>,
    interaction_id: InteractionId,
    kind: AgentKind,
    owner: AccountId,
    query: String,
) {
    tokio::spawn(run_dispatch(state, interaction_id, kind, owner, query));
}
