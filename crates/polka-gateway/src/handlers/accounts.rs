//! Account view handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use polka_types::AccountId;

use crate::dto::{BalanceResponse, InteractionView};
use crate::error::ApiResult;
use crate::state::AppState;

/// Ledger balance for one wallet address
///
/// Unknown addresses read as zero rather than 404; the ledger treats
/// balances as total credits minus debits.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<BalanceResponse>> {
    let account = AccountId::parse(address)?;
    let balance = state.ledger().balance(&account).await;
    Ok(Json(BalanceResponse::new(
        account.as_str().to_string(),
        balance,
    )))
}

/// Interactions submitted by one wallet address, in submission order
pub async fn account_interactions(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<Vec<InteractionView>>> {
    let account = AccountId::parse(address)?;
    let views = state
        .market()
        .user_interactions(&account)
        .await
        .into_iter()
        .map(InteractionView::from)
        .collect();
    Ok(Json(views))
}
