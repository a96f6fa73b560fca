//! Serial Generator
//!
//! Order serials are human-readable (`AA13`) and issued from a single
//! counter cell per client store (`Serial Numbers!B2`). Issuing is a plain
//! read-increment-write with no guard: two concurrent submissions can read
//! the same counter value and be issued the same serial. Callers accept
//! that race.

use std::sync::Arc;

use crate::ledger::model::SERIAL_SHEET;
use crate::store::{Cell, RangeSpec, TabularStore, cell_text};
use crate::utils::AppResult;

/// Serial prefix; the counter cell stores the full last-issued serial.
pub const SERIAL_PREFIX: &str = "AA";

/// Counter cell is B2.
const COUNTER_COL: u32 = 2;
const COUNTER_ROW: u32 = 2;

pub struct SerialGenerator {
    store: Arc<dyn TabularStore>,
}

impl SerialGenerator {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// Issue the next serial for `store_id` and persist it back to the
    /// counter cell.
    ///
    /// A blank or non-conforming counter cell restarts the sequence at 1.
    /// A store failure on either the read or the write aborts the
    /// submission: silently restarting the sequence after a transport
    /// error would collide with serials already on live rows.
    pub async fn next_serial(&self, store_id: &str) -> AppResult<String> {
        let range = RangeSpec::cell(SERIAL_SHEET, COUNTER_COL, COUNTER_ROW);

        let rows = self.store.read_range(store_id, &range).await?;
        let current = rows
            .first()
            .and_then(|row| row.first())
            .map(parse_counter)
            .unwrap_or(0);

        let serial = format!("{SERIAL_PREFIX}{}", current + 1);
        self.store
            .write_range(store_id, &range, vec![vec![Cell::from(serial.clone())]])
            .await?;

        Ok(serial)
    }
}

/// Extract the numeric suffix of the stored counter. Accepts `AA13`, `13`
/// or a numeric cell; anything else counts as 0.
fn parse_counter(cell: &Cell) -> u64 {
    let text = cell_text(cell);
    let digits = text.strip_prefix(SERIAL_PREFIX).unwrap_or(&text).trim();
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn generator_with_counter(cell: Cell) -> (SerialGenerator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_sheet(
                "budget",
                SERIAL_SHEET,
                vec![vec![json!("label"), json!("")], vec![json!("last"), cell]],
            )
            .await;
        (SerialGenerator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_fresh_counter_starts_at_one() {
        let (generator, _) = generator_with_counter(json!("")).await;
        assert_eq!(generator.next_serial("budget").await.unwrap(), "AA1");
    }

    #[tokio::test]
    async fn test_increments_and_persists() {
        let (generator, store) = generator_with_counter(json!("AA13")).await;
        assert_eq!(generator.next_serial("budget").await.unwrap(), "AA14");

        let grid = store.sheet_rows("budget", SERIAL_SHEET).await;
        assert_eq!(grid[1][1], json!("AA14"));

        assert_eq!(generator.next_serial("budget").await.unwrap(), "AA15");
    }

    #[tokio::test]
    async fn test_bare_number_and_junk_counters() {
        let (generator, _) = generator_with_counter(json!(7)).await;
        assert_eq!(generator.next_serial("budget").await.unwrap(), "AA8");

        let (generator, _) = generator_with_counter(json!("garbage")).await;
        assert_eq!(generator.next_serial("budget").await.unwrap(), "AA1");
    }
}
