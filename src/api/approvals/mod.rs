//! Approvals API Module
//!
//! The L2 review queue: summaries of waiting lines, per-serial and
//! per-branch approval, edits and cancellation.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/approvalsSummary", get(handler::approvals_summary))
        .route("/api/approvalDetails", get(handler::approval_details))
        .route("/api/pendingOrders", get(handler::pending_orders))
        .route("/api/approveBranchOrder", post(handler::approve_branch_order))
        .route("/api/approveOrder", post(handler::approve_order))
        .route("/api/updateWaitingOrder", post(handler::update_waiting_order))
        .route("/api/cancelOrder", post(handler::cancel_order))
}
