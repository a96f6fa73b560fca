//! Approvals Handlers
//!
//! All endpoints here are L2-only.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::views::{LineView, MutationResponse, line_views};
use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::ledger::model::{BranchSummary, Order, OrderStatus, QuantityEdit};
use crate::ledger::report;
use crate::utils::{AppError, AppResult, messages};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub success: bool,
    pub branches: Vec<BranchSummary>,
}

/// GET /api/approvalsSummary - branch totals of current-month waiting lines
pub async fn approvals_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SummaryResponse>> {
    user.require_l2()?;
    let rows = state
        .ledger
        .scan(&user.budget_sheet_id, OrderStatus::Waiting, Utc::now())
        .await?;
    Ok(Json(SummaryResponse {
        success: true,
        branches: report::branch_summary(&rows),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BranchQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    pub success: bool,
    pub items: Vec<LineView>,
}

/// GET /api/approvalDetails - waiting line items of one branch
pub async fn approval_details(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<DetailsResponse>> {
    user.require_l2()?;
    let branch = query
        .branch
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::validation(messages::MISSING_FIELDS))?;

    let rows = state
        .ledger
        .lines_for_branch(
            &user.budget_sheet_id,
            OrderStatus::Waiting,
            Some(&branch),
            Utc::now(),
        )
        .await?;
    Ok(Json(DetailsResponse {
        success: true,
        items: line_views(&rows),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// GET /api/pendingOrders - waiting lines grouped into orders (per-branch
/// pseudo-orders for legacy lines without a serial)
pub async fn pending_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<PendingOrdersResponse>> {
    user.require_l2()?;
    let rows = state
        .ledger
        .scan(&user.budget_sheet_id, OrderStatus::Waiting, Utc::now())
        .await?;
    Ok(Json(PendingOrdersResponse {
        success: true,
        orders: report::group_orders(&rows, OrderStatus::Waiting),
    }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BranchActionRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub branch: String,
}

/// POST /api/approveBranchOrder - move all waiting lines of a branch to
/// Final Orders (legacy flow)
pub async fn approve_branch_order(
    State(state): State<ServerState>,
    Json(req): Json<BranchActionRequest>,
) -> AppResult<Json<MutationResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;
    let user = state.identity.resolve(req.username.trim()).await?;
    user.require_l2()?;

    let moved = state
        .ledger
        .approve_branch(&user.budget_sheet_id, &req.branch, Utc::now())
        .await?;
    Ok(Json(MutationResponse::of(moved)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SerialActionRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub serial: String,
}

/// POST /api/approveOrder - move one serial's waiting lines to Final Orders
pub async fn approve_order(
    State(state): State<ServerState>,
    Json(req): Json<SerialActionRequest>,
) -> AppResult<Json<MutationResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;
    let user = state.identity.resolve(req.username.trim()).await?;
    user.require_l2()?;

    let moved = state
        .ledger
        .approve_serial(&user.budget_sheet_id, &req.serial, Utc::now())
        .await?;
    Ok(Json(MutationResponse::of(moved)))
}

/// POST /api/cancelOrder - move one serial's waiting lines to Cancelled
pub async fn cancel_order(
    State(state): State<ServerState>,
    Json(req): Json<SerialActionRequest>,
) -> AppResult<Json<MutationResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;
    let user = state.identity.resolve(req.username.trim()).await?;
    user.require_l2()?;

    let moved = state
        .ledger
        .cancel_serial(&user.budget_sheet_id, &req.serial, Utc::now())
        .await?;
    Ok(Json(MutationResponse::of(moved)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWaitingRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub serial: String,
    #[validate(length(min = 1))]
    pub items: Vec<EditItem>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditItem {
    pub product_code: String,
    pub quantity: i64,
}

/// POST /api/updateWaitingOrder - edit quantities of a waiting serial
pub async fn update_waiting_order(
    State(state): State<ServerState>,
    Json(req): Json<UpdateWaitingRequest>,
) -> AppResult<Json<MutationResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;
    let user = state.identity.resolve(req.username.trim()).await?;
    user.require_l2()?;

    let edits: Vec<QuantityEdit> = req
        .items
        .iter()
        .map(|i| QuantityEdit {
            product_code: i.product_code.clone(),
            quantity: i.quantity,
        })
        .collect();

    let touched = state
        .ledger
        .edit_waiting(&user.budget_sheet_id, &req.serial, &edits, Utc::now())
        .await?;
    Ok(Json(MutationResponse::of(touched)))
}
