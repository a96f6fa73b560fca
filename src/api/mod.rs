//! API 路由模块
//!
//! # 结构
//!
//! - [`auth`] - 登录验证
//! - [`catalog`] - 分支与商品目录
//! - [`orders`] - 订单提交与退货
//! - [`approvals`] - L2 审批队列
//! - [`reports`] - 全状态汇总
//! - [`export`] - xlsx 导出
//! - [`health`] - 健康检查

pub mod approvals;
pub mod auth;
pub mod catalog;
pub mod export;
pub mod health;
pub mod orders;
pub mod reports;
pub mod views;

use axum::Router;

use crate::core::ServerState;

/// Combined application router (paths are absolute, no nesting).
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(orders::router())
        .merge(approvals::router())
        .merge(reports::router())
        .merge(export::router())
        .merge(health::router())
}
