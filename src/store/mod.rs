//! 表格存储层 - 行式外部存储的窄接口
//!
//! 系统的持久层是一个外部电子表格服务。本模块只暴露四个原语
//! (读范围 / 写范围 / 末行追加 / 批量写) 加上标签页枚举，
//! 上层账本逻辑永远不接触 HTTP 细节。
//!
//! # 模块结构
//!
//! - [`TabularStore`] - 存储原语 trait
//! - [`sheets`] - reqwest HTTP 实现
//! - [`memory`] - 进程内实现 (测试与本地开发)
//! - [`range`] - A1 表示法范围

pub mod memory;
pub mod range;
pub mod sheets;

pub use memory::MemoryStore;
pub use range::RangeSpec;
pub use sheets::SheetsClient;

use async_trait::async_trait;
use thiserror::Error;

/// A single cell value as the store returns it: string, number, bool or null.
pub type Cell = serde_json::Value;

/// One spreadsheet row, left-to-right. Trailing blanks may be absent.
pub type RawRow = Vec<Cell>;

/// Order sheets span columns A..K.
pub const SHEET_COLUMNS: u32 = 11;

/// Data rows start below the header row.
pub const FIRST_DATA_ROW: u32 = 2;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network-level failure reaching the store.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The store answered with a body this client cannot interpret.
    #[error("invalid store response: {0}")]
    InvalidResponse(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// 存储原语 trait
///
/// Implementations must preserve two semantic details the ledger relies on:
///
/// - `read_range` returns rows with trailing fully-blank rows trimmed and
///   never fails on an empty range (it returns an empty vec).
/// - `append_rows` locates the last non-blank cell of column A and writes
///   immediately below it, spanning columns A..K. The locate-then-write pair
///   is two separate store calls; concurrent appends to the same sheet can
///   interleave between them. Callers accept that race.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read all non-trailing rows of `range`.
    async fn read_range(&self, store_id: &str, range: &RangeSpec) -> StoreResult<Vec<RawRow>>;

    /// Overwrite exactly the cells addressed by `range`.
    async fn write_range(
        &self,
        store_id: &str,
        range: &RangeSpec,
        rows: Vec<RawRow>,
    ) -> StoreResult<()>;

    /// Append `rows` below the last non-blank row of `sheet` (column A scan).
    /// Returns the 1-based row the first appended row landed on.
    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: Vec<RawRow>,
    ) -> StoreResult<u32>;

    /// Write multiple disjoint ranges in a single store call.
    /// No cross-range atomicity beyond the single network call.
    async fn batch_write(
        &self,
        store_id: &str,
        writes: Vec<(RangeSpec, Vec<RawRow>)>,
    ) -> StoreResult<()>;

    /// Enumerate the sheet (tab) titles of a store, in tab order.
    async fn list_sheets(&self, store_id: &str) -> StoreResult<Vec<String>>;
}

/// A cell counts as blank when it is null or an empty/whitespace string.
pub fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Null => true,
        Cell::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// A row counts as blank when every cell is blank (or it has none).
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(is_blank)
}

/// Coerce a cell to text the way the store UI shows it. Null becomes the
/// empty string; numbers keep their shortest form.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::String(s) => s.trim().to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(true) => "TRUE".to_string(),
        Cell::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}
