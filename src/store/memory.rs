//! In-process store implementation
//!
//! Backs tests and local development with the same observable semantics as
//! the HTTP client: jagged reads with trailing blanks trimmed, exact-cell
//! overwrites, and the two-step column-A append scan.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Cell, RangeSpec, RawRow, StoreError, StoreResult, TabularStore, is_blank};

#[derive(Debug, Default)]
struct MemorySheet {
    name: String,
    /// Dense grid; row 1 is index 0, column A is index 0.
    rows: Vec<RawRow>,
}

/// In-memory spreadsheet store, keyed by store id then sheet title.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stores: Mutex<HashMap<String, Vec<MemorySheet>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or create) a sheet's full grid. Test/seed helper.
    pub async fn seed_sheet(&self, store_id: &str, sheet: &str, rows: Vec<RawRow>) {
        let mut stores = self.stores.lock().await;
        let sheets = stores.entry(store_id.to_string()).or_default();
        match sheets.iter_mut().find(|s| s.name == sheet) {
            Some(existing) => existing.rows = rows,
            None => sheets.push(MemorySheet {
                name: sheet.to_string(),
                rows,
            }),
        }
    }

    /// Snapshot a sheet's dense grid. Test helper for asserting writes.
    pub async fn sheet_rows(&self, store_id: &str, sheet: &str) -> Vec<RawRow> {
        let stores = self.stores.lock().await;
        stores
            .get(store_id)
            .and_then(|sheets| sheets.iter().find(|s| s.name == sheet))
            .map(|s| s.rows.clone())
            .unwrap_or_default()
    }
}

fn slice_range(sheet: &MemorySheet, range: &RangeSpec) -> Vec<RawRow> {
    let start = range.start_row.saturating_sub(1) as usize;
    let end = range
        .end_row
        .map(|r| (r as usize).min(sheet.rows.len()))
        .unwrap_or(sheet.rows.len());

    let mut out: Vec<RawRow> = Vec::new();
    for row in sheet.rows.iter().take(end).skip(start) {
        let lo = (range.start_col - 1) as usize;
        let hi = (range.end_col as usize).min(row.len());
        let mut cells: RawRow = if lo < hi {
            row[lo..hi].to_vec()
        } else {
            Vec::new()
        };
        // The values API trims trailing blanks within a row
        while cells.last().is_some_and(is_blank) {
            cells.pop();
        }
        out.push(cells);
    }
    // ...and trailing blank rows
    while out.last().is_some_and(|r| r.is_empty()) {
        out.pop();
    }
    out
}

fn write_cells(sheet: &mut MemorySheet, range: &RangeSpec, rows: Vec<RawRow>) {
    for (i, cells) in rows.into_iter().enumerate() {
        let row_idx = (range.start_row - 1) as usize + i;
        if sheet.rows.len() <= row_idx {
            sheet.rows.resize_with(row_idx + 1, RawRow::new);
        }
        let row = &mut sheet.rows[row_idx];
        for (j, cell) in cells.into_iter().enumerate() {
            let col_idx = (range.start_col - 1) as usize + j;
            if col_idx >= range.end_col as usize {
                break;
            }
            if row.len() <= col_idx {
                row.resize(col_idx + 1, Cell::Null);
            }
            row[col_idx] = cell;
        }
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn read_range(&self, store_id: &str, range: &RangeSpec) -> StoreResult<Vec<RawRow>> {
        let stores = self.stores.lock().await;
        let sheets = stores
            .get(store_id)
            .ok_or_else(|| StoreError::Rejected {
                status: 404,
                body: format!("unknown store {store_id}"),
            })?;
        Ok(sheets
            .iter()
            .find(|s| s.name == range.sheet)
            .map(|s| slice_range(s, range))
            .unwrap_or_default())
    }

    async fn write_range(
        &self,
        store_id: &str,
        range: &RangeSpec,
        rows: Vec<RawRow>,
    ) -> StoreResult<()> {
        let mut stores = self.stores.lock().await;
        let sheets = stores.entry(store_id.to_string()).or_default();
        let pos = match sheets.iter().position(|s| s.name == range.sheet) {
            Some(p) => p,
            None => {
                sheets.push(MemorySheet {
                    name: range.sheet.clone(),
                    rows: Vec::new(),
                });
                sheets.len() - 1
            }
        };
        write_cells(&mut sheets[pos], range, rows);
        Ok(())
    }

    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: Vec<RawRow>,
    ) -> StoreResult<u32> {
        // Same locate-then-write pair as the HTTP client, under one lock
        // acquisition per step so the documented append race stays possible
        // for concurrent callers.
        let col_a = self
            .read_range(store_id, &RangeSpec::column(sheet, 1))
            .await?;

        let last_filled = col_a
            .iter()
            .rposition(|row| row.first().is_some_and(|c| !is_blank(c)))
            .map(|i| i as u32 + 1)
            .unwrap_or(0);

        let start_row = last_filled + 1;
        let end_row = start_row + (rows.len() as u32).saturating_sub(1);
        let range = RangeSpec::new(sheet, 1, start_row, super::SHEET_COLUMNS, Some(end_row));

        self.write_range(store_id, &range, rows).await?;
        Ok(start_row)
    }

    async fn batch_write(
        &self,
        store_id: &str,
        writes: Vec<(RangeSpec, Vec<RawRow>)>,
    ) -> StoreResult<()> {
        for (range, rows) in writes {
            self.write_range(store_id, &range, rows).await?;
        }
        Ok(())
    }

    async fn list_sheets(&self, store_id: &str) -> StoreResult<Vec<String>> {
        let stores = self.stores.lock().await;
        Ok(stores
            .get(store_id)
            .map(|sheets| sheets.iter().map(|s| s.name.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(values: &[&str]) -> RawRow {
        values.iter().map(|v| json!(v)).collect()
    }

    #[tokio::test]
    async fn test_read_trims_trailing_blanks() {
        let store = MemoryStore::new();
        store
            .seed_sheet(
                "s1",
                "Final Orders",
                vec![
                    row(&["date", "branch"]),
                    row(&["x", "y", "", ""]),
                    row(&["", "", ""]),
                ],
            )
            .await;

        let rows = store
            .read_range("s1", &RangeSpec::data_rows("Final Orders"))
            .await
            .expect("read");

        // Row 3 is fully blank and trailing, so only row 2 comes back
        assert_eq!(rows, vec![row(&["x", "y"])]);
    }

    #[tokio::test]
    async fn test_append_lands_below_last_non_empty() {
        let store = MemoryStore::new();
        store
            .seed_sheet(
                "s1",
                "Waiting for Approval",
                vec![row(&["header"]), row(&["a"]), row(&[""]), row(&[])],
            )
            .await;

        let start = store
            .append_rows("s1", "Waiting for Approval", vec![row(&["new"])])
            .await
            .expect("append");

        // Last non-blank column-A cell is row 2, so the append lands on row 3
        assert_eq!(start, 3);
        let grid = store.sheet_rows("s1", "Waiting for Approval").await;
        assert_eq!(grid[2][0], json!("new"));
    }

    #[tokio::test]
    async fn test_write_range_overwrites_exact_cells() {
        let store = MemoryStore::new();
        store
            .seed_sheet("s1", "Waiting for Approval", vec![row(&["a", "b", "c"])])
            .await;

        store
            .write_range(
                "s1",
                &RangeSpec::cell("Waiting for Approval", 2, 1),
                vec![row(&["B"])],
            )
            .await
            .expect("write");

        let grid = store.sheet_rows("s1", "Waiting for Approval").await;
        assert_eq!(grid[0], row(&["a", "B", "c"]));
    }
}
