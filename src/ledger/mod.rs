//! 订单账本 - 核心领域模块
//!
//! # 模块结构
//!
//! - [`model`] - 订单行、聚合与表布局常量
//! - [`codec`] - 11 列行编解码
//! - [`serial`] - 序号发生器 (`AA<n>`)
//! - [`manager`] - 状态机 (提交 / 批准 / 取消 / 编辑)
//! - [`report`] - 汇总聚合

pub mod codec;
pub mod manager;
pub mod model;
pub mod report;
pub mod serial;

pub use manager::{OrderLedger, ScanRow};
pub use model::{
    BranchSummary, CatalogItem, NewOrderItem, Order, OrderLine, OrderStatus, QuantityEdit,
    ReturnEdit,
};
