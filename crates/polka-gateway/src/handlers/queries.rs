//! Query flow handlers
//!
//! `POST /query` is the paid path: it debits the caller, records a pending
//! interaction, and hands the query to the dispatcher. The response lands
//! asynchronously; callers poll the interaction.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use polka_types::{AccountId, InteractionId, MarketError};

use crate::dispatch::spawn_dispatch;
use crate::dto::{InteractionView, QueryRequest, QueryResponse, SubmitResponseRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Accept a paid query and dispatch it to the agent's worker
pub async fn submit_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResponse>> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let wallet = AccountId::parse(request.wallet_address)?;
    let agent = state
        .market()
        .get_agent(request.agent_id)
        .await
        .ok_or(MarketError::AgentNotFound {
            agent_id: request.agent_id,
        })?;

    state.node().ensure_funded(&wallet).await?;

    let interaction_id = state
        .market()
        .query_agent(&wallet, agent.id, request.query.clone(), agent.price_per_query)
        .await?;

    info!(%interaction_id, agent_id = %agent.id, agent = %agent.metadata.kind, "query accepted");

    spawn_dispatch(
        state.clone(),
        interaction_id,
        agent.metadata.kind,
        agent.owner.clone(),
        request.query,
    );

    Ok(Json(QueryResponse::pending(interaction_id)))
}

/// Record a response for a pending interaction (worker callback path)
pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitResponseRequest>,
) -> ApiResult<Json<InteractionView>> {
    let interaction = state
        .market()
        .get_interaction(request.interaction_id)
        .await
        .ok_or(MarketError::InteractionNotFound {
            interaction_id: request.interaction_id,
        })?;

    if interaction.agent_id != request.agent_id {
        return Err(ApiError::BadRequest(format!(
            "interaction {} belongs to agent {}, not agent {}",
            interaction.id, interaction.agent_id, request.agent_id
        )));
    }

    let agent = state
        .market()
        .get_agent(interaction.agent_id)
        .await
        .ok_or(MarketError::AgentNotFound {
            agent_id: interaction.agent_id,
        })?;

    state
        .market()
        .submit_response(&agent.owner, request.interaction_id, request.response_data)
        .await?;

    let updated = state
        .market()
        .get_interaction(request.interaction_id)
        .await
        .ok_or(MarketError::InteractionNotFound {
            interaction_id: request.interaction_id,
        })?;
    Ok(Json(InteractionView::from(updated)))
}

/// Fetch one interaction by id
pub async fn get_interaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<InteractionView>> {
    let interaction_id = InteractionId::new(id);
    let interaction = state
        .market()
        .get_interaction(interaction_id)
        .await
        .ok_or(MarketError::InteractionNotFound { interaction_id })?;
    Ok(Json(InteractionView::from(interaction)))
}
