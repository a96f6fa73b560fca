//! User Extractor
//!
//! Every post-login GET endpoint carries `?username=...`; this extractor
//! resolves it into a [`CurrentUser`] via the identity cache so handlers
//! just declare the argument. POST handlers resolve the username from
//! their JSON payload instead.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::core::ServerState;
use crate::identity::CurrentUser;
use crate::utils::{AppError, messages};

#[derive(Debug, Deserialize)]
struct AuthQuery {
    username: Option<String>,
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved earlier in this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Query(query) = Query::<AuthQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::validation(messages::MISSING_FIELDS))?;

        let username = query
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::validation(messages::MISSING_FIELDS))?;

        let user = state.identity.resolve(&username).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
