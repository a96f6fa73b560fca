//! Export API Module
//!
//! Downloads of selected orders as an xlsx workbook.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/exportOrdersExcel", get(handler::export_orders_excel))
        .route("/api/exportOrderExcel", get(handler::export_order_excel))
}
