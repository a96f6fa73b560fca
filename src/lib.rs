//! Coral Order Server - 多分支采购订单管理后端
//!
//! # 架构概述
//!
//! 持久层是一个外部电子表格服务：订单按 11 列定位行存放在每个客户
//! 自己的表格里，三个标签页 (待审批 / 最终订单 / 已取消) 就是订单的
//! 生命周期状态。本服务把这个表格当作带键值扫描的记录系统使用：
//!
//! - **存储适配** (`store`): 读范围 / 写范围 / 末行追加 / 批量写
//! - **订单账本** (`ledger`): 按业务键定位行，用 move-and-clear 做状态转移
//! - **身份解析** (`identity`): 主凭证表扫描 + L1/L2 判定
//! - **导出** (`export`): 订单聚合 → xlsx
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── store/         # 表格存储适配器
//! ├── ledger/        # 订单领域：编解码、序号、状态机、汇总
//! ├── identity/      # 凭证解析与访问级别
//! ├── export/        # xlsx 导出
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、消息
//! ```

pub mod api;
pub mod core;
pub mod export;
pub mod identity;
pub mod ledger;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use identity::{AccessLevel, CurrentUser, IdentityResolver};
pub use ledger::{OrderLedger, OrderStatus};
pub use store::{MemoryStore, SheetsClient, TabularStore};
pub use utils::{AppError, AppResult};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______                __
  / ____/___  _________ _/ /
 / /   / __ \/ ___/ __ `/ /
/ /___/ /_/ / /  / /_/ / /
\____/\____/_/   \__,_/_/
    ____          __
   / __ \_________/ /__  __________
  / / / / ___/ __  / _ \/ ___/ ___/
 / /_/ / /  / /_/ /  __/ /  (__  )
 \____/_/   \__,_/\___/_/  /____/
    "#
    );
}
