//! Shared response shapes
//!
//! Success bodies always carry `success: true`; failures are rendered by
//! [`crate::utils::AppError`] as `{ success: false, message }`.

use serde::Serialize;

use crate::ledger::manager::ScanRow;
use crate::ledger::model::OrderLine;

/// One order line plus its physical sheet row, as the detail endpoints
/// return it. The row index is what the returns flow sends back to target
/// a specific line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub row_index: u32,
    #[serde(flatten)]
    pub line: OrderLine,
}

impl From<&ScanRow> for LineView {
    fn from(row: &ScanRow) -> Self {
        Self {
            row_index: row.row,
            line: row.line.clone(),
        }
    }
}

pub fn line_views(rows: &[ScanRow]) -> Vec<LineView> {
    rows.iter().map(LineView::from).collect()
}

/// Generic mutation acknowledgement: how many lines the operation touched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub success: bool,
    pub lines: usize,
}

impl MutationResponse {
    pub fn of(lines: usize) -> Self {
        Self {
            success: true,
            lines,
        }
    }
}
