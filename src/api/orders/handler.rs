//! Order Submission Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::views::{LineView, MutationResponse, line_views};
use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::ledger::model::{NewOrderItem, OrderStatus, ReturnEdit};
use crate::utils::{AppError, AppResult, messages};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub branch: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<SubmitItem>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitItem {
    #[validate(length(min = 1))]
    pub product_code: String,
    #[serde(default)]
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub order_serial: String,
}

/// POST /api/submitOrder
///
/// L1 users may only submit for their own branch; L2 submissions skip the
/// approval queue entirely.
pub async fn submit_order(
    State(state): State<ServerState>,
    Json(req): Json<SubmitOrderRequest>,
) -> AppResult<Json<SubmitResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;
    if req
        .items
        .iter()
        .any(|i| i.unit_price.is_sign_negative() || i.quantity < 0)
    {
        return Err(AppError::validation(messages::MISSING_FIELDS));
    }

    let user = state.identity.resolve(req.username.trim()).await?;
    user.ensure_branch(&req.branch)?;

    let items: Vec<NewOrderItem> = req
        .items
        .iter()
        .map(|i| NewOrderItem {
            product_code: i.product_code.clone(),
            product_name: i.product_name.clone(),
            unit_price: i.unit_price,
            quantity: i.quantity,
            category: i.category.clone(),
        })
        .collect();

    let serial = state
        .ledger
        .submit(&user.budget_sheet_id, &user, &req.branch, &items, Utc::now())
        .await?;

    Ok(Json(SubmitResponse {
        success: true,
        order_serial: serial,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PreviousOrdersQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousOrdersResponse {
    pub success: bool,
    pub branch: String,
    pub items: Vec<LineView>,
}

/// GET /api/previousOrders - the branch's current-month approved lines
pub async fn previous_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PreviousOrdersQuery>,
) -> AppResult<Json<PreviousOrdersResponse>> {
    let branch = query
        .branch
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| user.branch.clone());

    let rows = state
        .ledger
        .lines_for_branch(
            &user.budget_sheet_id,
            OrderStatus::Approved,
            Some(&branch),
            Utc::now(),
        )
        .await?;

    Ok(Json(PreviousOrdersResponse {
        success: true,
        branch,
        items: line_views(&rows),
    }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreviousRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub branch: String,
    #[validate(length(min = 1))]
    pub items: Vec<ReturnItem>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItem {
    #[serde(default)]
    pub product_code: String,
    pub quantity: i64,
    pub row_index: Option<u32>,
}

/// POST /api/updatePreviousOrders - returns flow: overwrite quantities of
/// approved lines, targeted by explicit row or `(branch, productCode)`
pub async fn update_previous_orders(
    State(state): State<ServerState>,
    Json(req): Json<UpdatePreviousRequest>,
) -> AppResult<Json<MutationResponse>> {
    req.validate()
        .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;

    let user = state.identity.resolve(req.username.trim()).await?;

    let edits: Vec<ReturnEdit> = req
        .items
        .iter()
        .map(|i| ReturnEdit {
            product_code: i.product_code.clone(),
            quantity: i.quantity,
            row: i.row_index,
        })
        .collect();

    let touched = state
        .ledger
        .update_approved(&user.budget_sheet_id, &req.branch, &edits, Utc::now())
        .await?;

    Ok(Json(MutationResponse::of(touched)))
}
