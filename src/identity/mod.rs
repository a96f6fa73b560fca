//! 身份模块 - 凭证分区扫描与访问级别判定
//!
//! # 模块结构
//!
//! - [`CurrentUser`] / [`AccessLevel`] - 已解析的用户上下文
//! - [`IdentityResolver`] - 主凭证表扫描 + TTL 缓存
//! - [`extractor`] - axum 提取器 (GET 端点的 `?username=`)

mod extractor;
pub mod resolver;
pub mod user;

pub use resolver::IdentityResolver;
pub use user::{AccessLevel, CurrentUser};
