//! Reports Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::views::{LineView, line_views};
use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::ledger::model::{Order, OrderStatus};
use crate::ledger::report;
use crate::utils::{AppError, AppResult, messages};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSummaryResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// GET /api/ordersSummaryForL2 (+aliases) - every current-month order
/// across all three sheets, keyed by serial and status
pub async fn orders_summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<OrdersSummaryResponse>> {
    user.require_l2()?;
    let now = Utc::now();

    let mut scans = Vec::new();
    for status in OrderStatus::all() {
        let rows = state.ledger.scan(&user.budget_sheet_id, status, now).await?;
        scans.push((status, rows));
    }

    Ok(Json(OrdersSummaryResponse {
        success: true,
        orders: report::status_summary(&scans),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub status: OrderStatus,
    pub serial: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsResponse {
    pub success: bool,
    pub items: Vec<LineView>,
}

/// GET /api/orderDetailsForL2 (+alias) - line items for one serial+status
/// or branch+status
pub async fn order_details(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<DetailsQuery>,
) -> AppResult<Json<OrderDetailsResponse>> {
    user.require_l2()?;

    let serial = query.serial.filter(|s| !s.trim().is_empty());
    let branch = query.branch.filter(|b| !b.trim().is_empty());
    if serial.is_none() && branch.is_none() {
        return Err(AppError::validation(messages::MISSING_FIELDS));
    }

    let mut rows = state
        .ledger
        .scan(&user.budget_sheet_id, query.status, Utc::now())
        .await?;
    if let Some(serial) = &serial {
        rows.retain(|r| &r.line.serial == serial);
    } else if let Some(branch) = &branch {
        rows.retain(|r| &r.line.branch == branch);
    }

    Ok(Json(OrderDetailsResponse {
        success: true,
        items: line_views(&rows),
    }))
}
