//! Login Handler
//!
//! No tokens are issued: every later call re-identifies the caller by
//! username against the credential partitions (through the resolver cache).

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::identity::AccessLevel;
use crate::utils::{AppError, AppResult, messages};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub branch: String,
    pub restricted: bool,
    pub level: AccessLevel,
    pub paper_mode: bool,
}

/// POST /api/validateLogin
pub async fn validate_login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::validation(messages::MISSING_FIELDS));
    }

    let user = state.identity.authenticate(username, &req.password).await?;
    tracing::info!(username = %user.username, level = ?user.level, "login ok");

    Ok(Json(LoginResponse {
        success: true,
        username: user.username,
        branch: user.branch,
        restricted: user.restricted,
        level: user.level,
        paper_mode: user.paper_mode,
    }))
}
