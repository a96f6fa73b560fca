//! Result alias used across handlers and services

use crate::utils::AppError;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
