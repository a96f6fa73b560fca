//! Export Handlers
//!
//! Both endpoints resolve orders across all three sheets, filter to the
//! requested serials and hand the aggregates to the export formatter.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;

use crate::core::ServerState;
use crate::export::{XLSX_CONTENT_TYPE, render_orders};
use crate::identity::CurrentUser;
use crate::ledger::model::{Order, OrderStatus};
use crate::ledger::report;
use crate::utils::{AppError, AppResult, messages};

#[derive(Debug, Deserialize)]
pub struct ExportOrdersQuery {
    /// Comma-separated serial list, e.g. `serials=AA1,AA7`.
    pub serials: Option<String>,
}

/// GET /api/exportOrdersExcel - xlsx for multiple serials, all statuses
pub async fn export_orders_excel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ExportOrdersQuery>,
) -> AppResult<Response> {
    user.require_l2()?;

    let serials: Vec<String> = query
        .serials
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if serials.is_empty() {
        return Err(AppError::validation(messages::MISSING_FIELDS));
    }

    let orders = resolve_orders(&state, &user, &serials).await?;
    let filename = format!("orders-{}.xlsx", Utc::now().format("%Y%m"));
    xlsx_response(render_orders(&orders)?, &filename)
}

#[derive(Debug, Deserialize)]
pub struct ExportOrderQuery {
    pub serial: Option<String>,
}

/// GET /api/exportOrderExcel - xlsx for one serial, all statuses
pub async fn export_order_excel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ExportOrderQuery>,
) -> AppResult<Response> {
    user.require_l2()?;

    let serial = query
        .serial
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation(messages::MISSING_FIELDS))?;

    let orders = resolve_orders(&state, &user, std::slice::from_ref(&serial)).await?;
    let filename = format!("order-{serial}.xlsx");
    xlsx_response(render_orders(&orders)?, &filename)
}

async fn resolve_orders(
    state: &ServerState,
    user: &CurrentUser,
    serials: &[String],
) -> AppResult<Vec<Order>> {
    let now = Utc::now();
    let mut scans = Vec::new();
    for status in OrderStatus::all() {
        let rows = state.ledger.scan(&user.budget_sheet_id, status, now).await?;
        scans.push((status, rows));
    }

    let mut orders = report::status_summary(&scans);
    orders.retain(|o| serials.contains(&o.serial));
    if orders.is_empty() {
        return Err(AppError::no_matching_rows());
    }
    Ok(orders)
}

fn xlsx_response(bytes: Vec<u8>, filename: &str) -> AppResult<Response> {
    Response::builder()
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(format!("response build failed: {e}")))
}
