/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | SHEETS_API_BASE | https://sheets.googleapis.com/v4/spreadsheets | 表格服务地址 |
/// | SHEETS_API_TOKEN | (空) | 表格服务访问令牌 |
/// | MASTER_SHEET_ID | (空) | 主凭证表 id |
/// | USER_CACHE_TTL_SECS | 60 | 用户解析缓存 TTL |
/// | REQUEST_TIMEOUT_MS | 30000 | 表格请求超时(毫秒) |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// MASTER_SHEET_ID=1aBc... HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 表格服务 values API 地址
    pub sheets_api_base: String,
    /// 表格服务 bearer 令牌
    pub sheets_api_token: String,
    /// 主凭证表 id (每个客户一个标签页)
    pub master_sheet_id: String,
    /// 用户名解析缓存 TTL (秒)
    pub user_cache_ttl_secs: u64,
    /// 表格请求超时 (毫秒)
    pub request_timeout_ms: u64,
    /// 最大并发请求数
    pub max_connections: u32,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            sheets_api_base: std::env::var("SHEETS_API_BASE")
                .unwrap_or_else(|_| "https://sheets.googleapis.com/v4/spreadsheets".into()),
            sheets_api_token: std::env::var("SHEETS_API_TOKEN").unwrap_or_default(),
            master_sheet_id: std::env::var("MASTER_SHEET_ID").unwrap_or_default(),
            user_cache_ttl_secs: std::env::var("USER_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
