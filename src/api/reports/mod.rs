//! Reports API Module
//!
//! The all-status L2 dashboard. The summary and detail routes kept their
//! historical aliases; every alias hits the same handler.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/ordersSummaryForL2", get(handler::orders_summary))
        .route("/api/ordersSummary", get(handler::orders_summary))
        .route("/api/allOrdersForL2", get(handler::orders_summary))
        .route("/api/orderDetailsForL2", get(handler::order_details))
        .route("/api/orderDetails", get(handler::order_details))
}
