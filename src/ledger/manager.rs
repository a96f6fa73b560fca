//! Order Ledger - 订单生命周期状态机
//!
//! 三个逻辑表之间的状态转移全部用 move-and-clear 模拟：
//! 把匹配行原样追加到目标表，再把源行覆盖为 11 个空串
//! (绝不物理删除，保持无关行的行号稳定)。
//!
//! 每次扫描都限定在请求时刻的自然月内；上月的行对所有操作
//! 永久不可见，等于就地归档。append 与 clear 是两次独立的
//! 网络调用，中途失败会把订单同时留在两张表上。调用方只会
//! 看到一个整体失败，没有补偿回滚。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::identity::{AccessLevel, CurrentUser};
use crate::ledger::codec;
use crate::ledger::model::{
    CATALOG_SHEET, CatalogItem, NewOrderItem, OrderLine, OrderStatus, QuantityEdit, ReturnEdit,
};
use crate::ledger::serial::SerialGenerator;
use crate::store::{
    Cell, FIRST_DATA_ROW, RangeSpec, RawRow, TabularStore, cell_text, is_blank_row,
};
use crate::utils::{AppError, AppResult, messages};

/// One decoded line plus where it physically lives. `raw` is kept so that
/// moves copy the original cells verbatim (a day-serial date must not be
/// rewritten as text in transit).
#[derive(Debug, Clone)]
pub struct ScanRow {
    /// 1-based sheet row.
    pub row: u32,
    pub raw: RawRow,
    pub line: OrderLine,
}

pub struct OrderLedger {
    store: Arc<dyn TabularStore>,
    serials: SerialGenerator,
}

impl OrderLedger {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        let serials = SerialGenerator::new(store.clone());
        Self { store, serials }
    }

    // ── Scanning ────────────────────────────────────────────────────

    /// Scan one logical sheet and return the current-month lines, in row
    /// order. Cleared rows are skipped silently; rows the codec rejects are
    /// quarantined with a warning.
    pub async fn scan(
        &self,
        store_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ScanRow>> {
        let sheet = status.sheet_name();
        let rows = self
            .store
            .read_range(store_id, &RangeSpec::data_rows(sheet))
            .await?;

        let mut out = Vec::new();
        for (i, raw) in rows.into_iter().enumerate() {
            let row = FIRST_DATA_ROW + i as u32;
            if is_blank_row(&raw) {
                continue;
            }
            let line = match codec::decode_row(&raw) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(sheet, row, error = %e, "quarantined malformed row");
                    continue;
                }
            };
            let Some(date) = line.date else { continue };
            if !codec::is_current_month(date, now) {
                continue;
            }
            out.push(ScanRow { row, raw, line });
        }
        Ok(out)
    }

    /// Current-month lines of one sheet, optionally filtered by branch.
    pub async fn lines_for_branch(
        &self,
        store_id: &str,
        status: OrderStatus,
        branch: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ScanRow>> {
        let mut rows = self.scan(store_id, status, now).await?;
        if let Some(branch) = branch {
            rows.retain(|r| r.line.branch == branch);
        }
        Ok(rows)
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Create a new order. L1 submissions land on the Waiting sheet; an L2
    /// submission goes straight to Final Orders, bypassing approval. All
    /// lines are tagged with one freshly issued serial, which is returned.
    pub async fn submit(
        &self,
        store_id: &str,
        user: &CurrentUser,
        branch: &str,
        items: &[NewOrderItem],
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        if items.is_empty() {
            return Err(AppError::validation(messages::EMPTY_ORDER));
        }

        let serial = self.serials.next_serial(store_id).await?;

        let rows: Vec<RawRow> = items
            .iter()
            .map(|item| {
                let quantity = item.quantity.max(0);
                let line = OrderLine {
                    date: Some(now),
                    branch: branch.to_string(),
                    requested_by: user.username.clone(),
                    product_code: item.product_code.clone(),
                    product_name: item.product_name.clone(),
                    unit_price: item.unit_price,
                    subtotal: item.unit_price * Decimal::from(quantity),
                    category: item.category.clone(),
                    quantity,
                    serial: serial.clone(),
                };
                codec::encode_row(&line)
            })
            .collect();

        let target = match user.level {
            AccessLevel::L2 => OrderStatus::Approved,
            AccessLevel::L1 => OrderStatus::Waiting,
        };

        let start_row = self
            .store
            .append_rows(store_id, target.sheet_name(), rows)
            .await?;

        tracing::info!(
            serial = %serial,
            branch,
            sheet = target.sheet_name(),
            start_row,
            lines = items.len(),
            "order submitted"
        );
        Ok(serial)
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Approve: move every current-month Waiting line of `serial` to Final
    /// Orders. A serial already moved finds zero Waiting rows and fails.
    pub async fn approve_serial(
        &self,
        store_id: &str,
        serial: &str,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let mut rows = self.scan(store_id, OrderStatus::Waiting, now).await?;
        rows.retain(|r| r.line.serial == serial);
        self.move_rows(store_id, OrderStatus::Waiting, OrderStatus::Approved, rows)
            .await
    }

    /// Cancel: same move-and-clear, target Cancelled Orders.
    pub async fn cancel_serial(
        &self,
        store_id: &str,
        serial: &str,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let mut rows = self.scan(store_id, OrderStatus::Waiting, now).await?;
        rows.retain(|r| r.line.serial == serial);
        self.move_rows(store_id, OrderStatus::Waiting, OrderStatus::Cancelled, rows)
            .await
    }

    /// Legacy flow: approve every current-month Waiting line of a branch at
    /// once, regardless of serial.
    pub async fn approve_branch(
        &self,
        store_id: &str,
        branch: &str,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let mut rows = self.scan(store_id, OrderStatus::Waiting, now).await?;
        rows.retain(|r| r.line.branch == branch);
        self.move_rows(store_id, OrderStatus::Waiting, OrderStatus::Approved, rows)
            .await
    }

    /// Append the raw rows to `to`, then clear the source rows in one batch
    /// call. Append-then-clear is not atomic; a failure in between leaves
    /// the lines present on both sheets and surfaces only as this method's
    /// error.
    pub(crate) async fn move_rows(
        &self,
        store_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        rows: Vec<ScanRow>,
    ) -> AppResult<usize> {
        if rows.is_empty() {
            return Err(AppError::no_matching_rows());
        }

        let payload: Vec<RawRow> = rows.iter().map(|r| r.raw.clone()).collect();
        self.store
            .append_rows(store_id, to.sheet_name(), payload)
            .await?;

        let clears: Vec<(RangeSpec, Vec<RawRow>)> = rows
            .iter()
            .map(|r| {
                (
                    RangeSpec::row_span(from.sheet_name(), r.row),
                    vec![codec::clear_row()],
                )
            })
            .collect();
        self.store.batch_write(store_id, clears).await?;

        tracing::info!(
            from = from.sheet_name(),
            to = to.sheet_name(),
            lines = rows.len(),
            "order moved"
        );
        Ok(rows.len())
    }

    // ── Targeted quantity edits ─────────────────────────────────────

    /// Edit a Waiting order: for every `(serial, product_code)` match in the
    /// current month, overwrite only the quantity and subtotal cells.
    /// Quantities are floored at 0 and subtotals recomputed from the row's
    /// own unit price.
    pub async fn edit_waiting(
        &self,
        store_id: &str,
        serial: &str,
        edits: &[QuantityEdit],
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let rows = self.scan(store_id, OrderStatus::Waiting, now).await?;

        let mut writes = Vec::new();
        let mut touched = 0;
        for edit in edits {
            for r in rows.iter().filter(|r| {
                r.line.serial == serial && r.line.product_code == edit.product_code
            }) {
                push_quantity_write(&mut writes, OrderStatus::Waiting, r, edit.quantity);
                touched += 1;
            }
        }

        if touched == 0 {
            return Err(AppError::no_matching_rows());
        }
        self.store.batch_write(store_id, writes).await?;
        Ok(touched)
    }

    /// Returns flow against Final Orders: each edit targets its explicit row
    /// if one was supplied, otherwise the last `(branch, product_code)`
    /// match in the current month.
    pub async fn update_approved(
        &self,
        store_id: &str,
        branch: &str,
        edits: &[ReturnEdit],
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let rows = self.scan(store_id, OrderStatus::Approved, now).await?;

        let mut writes = Vec::new();
        let mut touched = 0;
        for edit in edits {
            let target = match edit.row {
                Some(row) => rows.iter().find(|r| r.row == row),
                None => rows
                    .iter()
                    .filter(|r| {
                        r.line.branch == branch && r.line.product_code == edit.product_code
                    })
                    .last(),
            };
            if let Some(r) = target {
                push_quantity_write(&mut writes, OrderStatus::Approved, r, edit.quantity);
                touched += 1;
            }
        }

        if touched == 0 {
            return Err(AppError::no_matching_rows());
        }
        self.store.batch_write(store_id, writes).await?;
        Ok(touched)
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Load the client's product catalog (columns A..D of `Product Catalog`).
    pub async fn catalog(&self, store_id: &str) -> AppResult<Vec<CatalogItem>> {
        let rows = self
            .store
            .read_range(
                store_id,
                &RangeSpec::new(CATALOG_SHEET, 1, FIRST_DATA_ROW, 4, None),
            )
            .await?;

        let mut items = Vec::new();
        for (i, raw) in rows.iter().enumerate() {
            if is_blank_row(raw) {
                continue;
            }
            let price = match codec::cell_decimal("unitPrice", raw.get(2).unwrap_or(&Cell::Null)) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(
                        sheet = CATALOG_SHEET,
                        row = FIRST_DATA_ROW + i as u32,
                        error = %e,
                        "quarantined catalog row"
                    );
                    continue;
                }
            };
            items.push(CatalogItem {
                product_code: cell_text(raw.first().unwrap_or(&Cell::Null)),
                product_name: cell_text(raw.get(1).unwrap_or(&Cell::Null)),
                unit_price: price,
                category: cell_text(raw.get(3).unwrap_or(&Cell::Null)),
            });
        }
        Ok(items)
    }

    /// A branch's current-month Approved total.
    pub async fn monthly_spending(
        &self,
        store_id: &str,
        branch: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Decimal> {
        let rows = self
            .lines_for_branch(store_id, OrderStatus::Approved, Some(branch), now)
            .await?;
        Ok(rows.iter().map(|r| r.line.subtotal).sum())
    }
}

fn push_quantity_write(
    writes: &mut Vec<(RangeSpec, Vec<RawRow>)>,
    status: OrderStatus,
    target: &ScanRow,
    quantity: i64,
) {
    let quantity = quantity.max(0);
    let subtotal = target.line.unit_price * Decimal::from(quantity);
    let sheet = status.sheet_name();
    writes.push((
        RangeSpec::cell(sheet, codec::COL_SUBTOTAL as u32 + 1, target.row),
        vec![vec![codec::decimal_cell(subtotal)]],
    ));
    writes.push((
        RangeSpec::cell(sheet, codec::COL_QUANTITY as u32 + 1, target.row),
        vec![vec![Cell::from(quantity)]],
    ));
}
