//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResult`] - 应用 Result 别名
//! - [`messages`] - 面向用户的本地化消息
//! - 日志等工具

pub mod error;
pub mod logger;
pub mod messages;
pub mod result;

pub use error::{AppError, ErrorBody};
pub use result::AppResult;
