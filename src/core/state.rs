use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::Config;
use crate::identity::IdentityResolver;
use crate::ledger::OrderLedger;
use crate::store::{SheetsClient, TabularStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 每个请求克隆一份 (Arc 浅拷贝)。系统没有进程内业务缓存：
/// 所有订单实体都在每次请求时从外部表格重建，仅用户名解析
/// 走 [`IdentityResolver`] 的 TTL 缓存。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 表格存储适配器 |
/// | identity | 凭证解析 (含 TTL 缓存) |
/// | ledger | 订单账本 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn TabularStore>,
    pub identity: Arc<IdentityResolver>,
    pub ledger: Arc<OrderLedger>,
    pub started_at: Instant,
}

impl ServerState {
    /// 初始化服务器状态 (HTTP 表格客户端)
    pub fn initialize(config: &Config) -> Self {
        let store: Arc<dyn TabularStore> = Arc::new(SheetsClient::new(
            config.sheets_api_base.clone(),
            config.sheets_api_token.clone(),
            config.request_timeout_ms,
        ));
        Self::with_store(config.clone(), store)
    }

    /// 使用指定存储实现构造状态
    ///
    /// 常用于测试场景 (MemoryStore)
    pub fn with_store(config: Config, store: Arc<dyn TabularStore>) -> Self {
        let identity = Arc::new(IdentityResolver::new(
            store.clone(),
            config.master_sheet_id.clone(),
            Duration::from_secs(config.user_cache_ttl_secs),
        ));
        let ledger = Arc::new(OrderLedger::new(store.clone()));

        Self {
            config,
            store,
            identity,
            ledger,
            started_at: Instant::now(),
        }
    }

    /// 服务已运行秒数
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
