//! Catalog Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::ledger::model::CatalogItem;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchesResponse {
    pub success: bool,
    pub branches: Vec<String>,
}

/// GET /api/branchesForL2 - branches visible to an L2 user's client
pub async fn branches_for_l2(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<BranchesResponse>> {
    user.require_l2()?;
    let branches = state.identity.client_branches(&user).await?;
    Ok(Json(BranchesResponse {
        success: true,
        branches,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub success: bool,
    pub branch: String,
    pub items: Vec<CatalogItem>,
    /// The branch's current-month approved total.
    pub spending: Decimal,
}

/// GET /api/loadOrderDataWithSpending - product catalog plus the branch's
/// current-month approved spending
pub async fn load_order_data_with_spending(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<CatalogResponse>> {
    let branch = query
        .branch
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| user.branch.clone());

    let items = state.ledger.catalog(&user.budget_sheet_id).await?;
    let spending = state
        .ledger
        .monthly_spending(&user.budget_sheet_id, &branch, Utc::now())
        .await?;

    Ok(Json(CatalogResponse {
        success: true,
        branch,
        items,
        spending,
    }))
}
