//! Market event feed handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::dto::EventsResponse;
use crate::state::AppState;

/// Events returned when no limit is given
const DEFAULT_EVENT_LIMIT: usize = 50;

/// Query parameters for the event feed
#[derive(Debug, Deserialize)]
pub struct EventsParams {
    /// Maximum events to return
    pub limit: Option<usize>,
}

/// Recent market events, newest first
pub async fn recent_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsParams>,
) -> Json<EventsResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let events = state.market().recent_events(limit).await;
    Json(EventsResponse { events })
}
