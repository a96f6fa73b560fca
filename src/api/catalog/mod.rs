//! Catalog API Module
//!
//! Branch list and product catalog lookups.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/branchesForL2", get(handler::branches_for_l2))
        .route(
            "/api/loadOrderDataWithSpending",
            get(handler::load_order_data_with_spending),
        )
}
