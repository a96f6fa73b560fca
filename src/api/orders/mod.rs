//! Order Submission API Module
//!
//! Submission plus the branch-facing views of approved orders (the returns
//! flow edits approved quantities in place).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/submitOrder", post(handler::submit_order))
        .route("/api/previousOrders", get(handler::previous_orders))
        .route(
            "/api/updatePreviousOrders",
            post(handler::update_previous_orders),
        )
}
