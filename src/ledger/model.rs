//! Order domain records
//!
//! An order has no row of its own in the store: it is reconstructed on every
//! request from the scattered 11-column lines that share its serial. Which
//! sheet a line was read from *is* its lifecycle state; there is no status
//! column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::messages;

// ── Per-client sheet layout ─────────────────────────────────────────

pub const WAITING_SHEET: &str = "Waiting for Approval";
pub const FINAL_SHEET: &str = "Final Orders";
pub const CANCELLED_SHEET: &str = "Cancelled Orders";
pub const CATALOG_SHEET: &str = "Product Catalog";
pub const SERIAL_SHEET: &str = "Serial Numbers";

/// Lifecycle state, derived from the sheet a line was read from.
/// `Approved` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Waiting,
    Approved,
    Cancelled,
}

impl OrderStatus {
    /// The sheet (tab) that holds lines in this state.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => WAITING_SHEET,
            OrderStatus::Approved => FINAL_SHEET,
            OrderStatus::Cancelled => CANCELLED_SHEET,
        }
    }

    /// Display label (summary keys, export column B).
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => messages::STATUS_WAITING,
            OrderStatus::Approved => messages::STATUS_APPROVED,
            OrderStatus::Cancelled => messages::STATUS_CANCELLED,
        }
    }

    pub fn all() -> [OrderStatus; 3] {
        [
            OrderStatus::Waiting,
            OrderStatus::Approved,
            OrderStatus::Cancelled,
        ]
    }
}

/// One spreadsheet row (columns A..K). Column J is reserved and always
/// written blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Column A. `None` means the cell was blank or unparseable; such lines
    /// never pass the current-month filter.
    pub date: Option<DateTime<Utc>>,
    /// Column B
    pub branch: String,
    /// Column C
    pub requested_by: String,
    /// Column D, business key
    pub product_code: String,
    /// Column E, denormalized
    pub product_name: String,
    /// Column F
    pub unit_price: Decimal,
    /// Column G. `unit_price * quantity` on write; a stored value that
    /// disagrees is kept as read (legacy tolerance).
    pub subtotal: Decimal,
    /// Column H
    pub category: String,
    /// Column I
    pub quantity: i64,
    /// Column K, e.g. `AA13`. Blank on legacy rows.
    pub serial: String,
}

/// Input line for a new submission.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_code: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub category: String,
}

/// Quantity change against a Waiting serial, keyed by product code.
#[derive(Debug, Clone)]
pub struct QuantityEdit {
    pub product_code: String,
    pub quantity: i64,
}

/// Quantity change against Final Orders (returns). An explicit `row`
/// pins the target; otherwise the last `(branch, product_code)` match
/// within the current month wins.
#[derive(Debug, Clone)]
pub struct ReturnEdit {
    pub product_code: String,
    pub quantity: i64,
    pub row: Option<u32>,
}

/// Aggregate of all lines sharing a serial (or a branch, for legacy lines
/// with no serial). `total` is always recomputed from the items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub serial: String,
    pub branch_name: String,
    pub status: OrderStatus,
    /// Single requester if unanimous, the multiple-users sentinel otherwise.
    pub requested_by: String,
    /// Earliest line date.
    pub created_at: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub items: Vec<OrderLine>,
}

/// Current-month Waiting totals for one branch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub branch_name: String,
    pub total_amount: Decimal,
    pub total_qty: i64,
    pub line_count: usize,
}

/// One row of the `Product Catalog` sheet (columns A..D).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub product_code: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub category: String,
}
