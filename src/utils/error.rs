//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ErrorBody`] - 失败响应结构
//!
//! # 错误分类
//!
//! | 分类 | HTTP | 说明 |
//! |------|------|------|
//! | Auth | 400 | 凭证错误、用户不存在 |
//! | Forbidden | 403 | 权限不足、分支不匹配 |
//! | Validation | 400 | 请求字段缺失、无匹配行 |
//! | MissingConfiguration | 500 | 客户端配置单元格为空 |
//! | Store | 500 | 表格存储传输错误 |
//! | Internal | 500 | 未预期错误 |
//!
//! 所有失败响应统一为 `{ "success": false, "message": "<localized>" }`，
//! 面向用户的消息一律取自 [`crate::utils::messages`]，内部细节只进日志。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;
use crate::utils::messages;

/// 失败响应结构
///
/// ```json
/// { "success": false, "message": "..." }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 凭证错误或用户不存在 (400)，负载为本地化消息
    #[error("authentication failed: {0}")]
    Auth(String),

    /// 权限不足 (403)，负载为本地化消息
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 请求校验失败或无匹配行 (400)，负载为本地化消息
    #[error("validation failed: {0}")]
    Validation(String),

    /// 必需的配置单元格为空 (500)，负载为内部细节
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// 表格存储传输错误 (500)，负载为内部细节
    #[error("store unavailable: {0}")]
    Store(String),

    /// 未预期错误 (500)，负载为内部细节
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Auth(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            // 5xx: 记录内部细节，对外只返回通用本地化消息
            AppError::MissingConfiguration(detail) => {
                error!(target: "config", error = %detail, "Missing configuration cell");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::MISSING_CONFIGURATION.to_string(),
                )
            }
            AppError::Store(detail) => {
                error!(target: "store", error = %detail, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::STORE_UNAVAILABLE.to_string(),
                )
            }
            AppError::Internal(detail) => {
                error!(target: "internal", error = %detail, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::INTERNAL_ERROR.to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    /// Invalid credentials with the unified localized message.
    /// Used for both "wrong password" and "no such user" to prevent
    /// username enumeration during login.
    pub fn invalid_credentials() -> Self {
        Self::Auth(messages::INVALID_CREDENTIALS.to_string())
    }

    /// Authenticated lookup failed (post-login endpoints).
    pub fn user_not_found() -> Self {
        Self::Auth(messages::USER_NOT_FOUND.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// A mutation matched zero rows in its source sheet.
    pub fn no_matching_rows() -> Self {
        Self::Validation(messages::NO_MATCHING_ROWS.to_string())
    }

    pub fn missing_configuration(detail: impl Into<String>) -> Self {
        Self::MissingConfiguration(detail.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }
}
