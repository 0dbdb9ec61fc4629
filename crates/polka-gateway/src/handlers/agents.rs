//! Agent registry handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use polka_types::{AccountId, AgentId, AgentRecord, MarketError};

use crate::dto::{
    AgentListResponse, InteractionView, RegisterAgentRequest, UpdateAgentRequest, WithdrawRequest,
    WithdrawResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// List all registered agents
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<AgentListResponse> {
    let agents = state.market().list_agents().await;
    Json(AgentListResponse { agents })
}

/// Fetch one agent by id
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<Json<AgentRecord>> {
    let agent_id = AgentId::new(id);
    let record = state
        .market()
        .get_agent(agent_id)
        .await
        .ok_or(MarketError::AgentNotFound { agent_id })?;
    Ok(Json(record))
}

/// Register a new agent, staking the owner's deposit
pub async fn register_agent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterAgentRequest>,
) -> ApiResult<(StatusCode, Json<AgentRecord>)> {
    let owner = AccountId::parse(request.owner)?;
    state.node().ensure_funded(&owner).await?;

    let agent_id = state
        .market()
        .register_agent(
            &owner,
            request.metadata,
            request.price_per_query,
            request.stake_amount,
        )
        .await?;
    let record = state
        .market()
        .get_agent(agent_id)
        .await
        .ok_or(MarketError::AgentNotFound { agent_id })?;

    info!(%agent_id, owner = %record.owner, "agent registered");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Partially update an agent; owner only
pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(request): Json<UpdateAgentRequest>,
) -> ApiResult<Json<AgentRecord>> {
    let owner = AccountId::parse(request.owner)?;
    let record = state
        .market()
        .update_agent(
            &owner,
            AgentId::new(id),
            request.metadata,
            request.price_per_query,
            request.active,
        )
        .await?;
    Ok(Json(record))
}

/// Deactivate an agent and refund its stake; owner only
pub async fn withdraw_stake(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(request): Json<WithdrawRequest>,
) -> ApiResult<Json<WithdrawResponse>> {
    let owner = AccountId::parse(request.owner)?;
    let agent_id = AgentId::new(id);
    let refunded = state.market().withdraw_stake(&owner, agent_id).await?;

    info!(%agent_id, refunded = %refunded, "stake withdrawn");
    Ok(Json(WithdrawResponse { agent_id, refunded }))
}

/// Interactions recorded against one agent
pub async fn agent_interactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<Json<Vec<InteractionView>>> {
    let agent_id = AgentId::new(id);
    if state.market().get_agent(agent_id).await.is_none() {
        return Err(MarketError::AgentNotFound { agent_id }.into());
    }

    let views = state
        .market()
        .agent_interactions(agent_id)
        .await
        .into_iter()
        .map(InteractionView::from)
        .collect();
    Ok(Json(views))
}
