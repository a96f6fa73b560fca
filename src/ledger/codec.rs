//! Row codec - 11 列定位行与 [`OrderLine`] 之间的转换
//!
//! 存储返回的单元格是松散类型的：日期既可能是表格纪元的天序号，
//! 也可能是文本时间戳；数字列可能是 JSON number 或字符串。
//! 缺失的尾部单元格按空串/零处理 (values API 会裁剪尾部空白)，
//! 但数字列中的非数字内容是 [`CodecError`]，该行由扫描层隔离。

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;
use thiserror::Error;

use crate::ledger::model::OrderLine;
use crate::store::{Cell, RawRow, cell_text};

// ── Column positions (0-based within A..K) ──────────────────────────

pub const COL_DATE: usize = 0;
pub const COL_BRANCH: usize = 1;
pub const COL_REQUESTED_BY: usize = 2;
pub const COL_PRODUCT_CODE: usize = 3;
pub const COL_PRODUCT_NAME: usize = 4;
pub const COL_UNIT_PRICE: usize = 5;
pub const COL_SUBTOTAL: usize = 6;
pub const COL_CATEGORY: usize = 7;
pub const COL_QUANTITY: usize = 8;
pub const COL_RESERVED: usize = 9;
pub const COL_SERIAL: usize = 10;

/// Day-serial values at or below this are not treated as dates.
const DAY_SERIAL_MIN: f64 = 30000.0;

/// Timestamp format used when this system writes a row.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CELL_NULL: Cell = Cell::Null;

/// Codec error types. A failing row is quarantined by the scan layer, not
/// silently coerced.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("column {col}: expected a number, got '{value}'")]
    NotNumeric { col: &'static str, value: String },

    #[error("column {col}: expected a non-negative integer, got '{value}'")]
    BadQuantity { col: &'static str, value: String },
}

fn cell_at(raw: &[Cell], idx: usize) -> &Cell {
    raw.get(idx).unwrap_or(&CELL_NULL)
}

// ── Dates ───────────────────────────────────────────────────────────

/// Spreadsheet epoch: day-serial 0 is 1899-12-30.
fn sheet_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn day_serial_to_utc(serial: f64) -> Option<DateTime<Utc>> {
    let date = sheet_epoch()?.checked_add_signed(Duration::days(serial.trunc() as i64))?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn parse_text_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Decode the date cell. A blank cell yields `None` (the row is rejected by
/// current-month filters). A number above 30000 is a store-native day serial
/// counted from 1899-12-30, mapped to UTC midnight of that day. Anything
/// else is tried as a textual timestamp; unparseable values yield `None`.
pub fn decode_date(cell: &Cell) -> Option<DateTime<Utc>> {
    let text = match cell {
        Cell::Null => return None,
        Cell::Number(n) => {
            let v = n.as_f64()?;
            return if v > DAY_SERIAL_MIN {
                day_serial_to_utc(v)
            } else {
                None
            };
        }
        Cell::String(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    if let Ok(v) = text.parse::<f64>() {
        return if v > DAY_SERIAL_MIN {
            day_serial_to_utc(v)
        } else {
            None
        };
    }
    parse_text_date(text)
}

/// The sole time-windowing filter: same calendar year and month (UTC).
/// Rows dated in prior months are invisible to every ledger operation.
pub fn is_current_month(ts: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    ts.year() == reference.year() && ts.month() == reference.month()
}

pub fn encode_date(ts: DateTime<Utc>) -> String {
    ts.format(DATE_FORMAT).to_string()
}

// ── Numeric cells ───────────────────────────────────────────────────

pub fn cell_decimal(col: &'static str, cell: &Cell) -> Result<Decimal, CodecError> {
    let not_numeric = || CodecError::NotNumeric {
        col,
        value: cell_text(cell),
    };
    match cell {
        Cell::Null => Ok(Decimal::ZERO),
        Cell::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .ok_or_else(not_numeric),
        Cell::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(s).map_err(|_| not_numeric())
        }
        _ => Err(not_numeric()),
    }
}

fn cell_quantity(col: &'static str, cell: &Cell) -> Result<i64, CodecError> {
    let value = cell_decimal(col, cell)?;
    let bad = || CodecError::BadQuantity {
        col,
        value: cell_text(cell),
    };
    if value.is_sign_negative() && !value.is_zero() {
        return Err(bad());
    }
    if !value.fract().is_zero() {
        return Err(bad());
    }
    value.to_i64().ok_or_else(bad)
}

/// Render a Decimal as the store writes numbers: integers without a
/// fraction, everything else as a float.
pub fn decimal_cell(value: Decimal) -> Cell {
    if value.fract().is_zero()
        && let Some(i) = value.to_i64()
    {
        return Cell::from(i);
    }
    Cell::from(value.to_f64().unwrap_or(0.0))
}

// ── Rows ────────────────────────────────────────────────────────────

/// Decode one raw row positionally. Missing trailing cells default to the
/// empty string / zero; malformed numeric cells fail.
pub fn decode_row(raw: &RawRow) -> Result<OrderLine, CodecError> {
    Ok(OrderLine {
        date: decode_date(cell_at(raw, COL_DATE)),
        branch: cell_text(cell_at(raw, COL_BRANCH)),
        requested_by: cell_text(cell_at(raw, COL_REQUESTED_BY)),
        product_code: cell_text(cell_at(raw, COL_PRODUCT_CODE)),
        product_name: cell_text(cell_at(raw, COL_PRODUCT_NAME)),
        unit_price: cell_decimal("unitPrice", cell_at(raw, COL_UNIT_PRICE))?,
        subtotal: cell_decimal("subtotal", cell_at(raw, COL_SUBTOTAL))?,
        category: cell_text(cell_at(raw, COL_CATEGORY)),
        quantity: cell_quantity("quantity", cell_at(raw, COL_QUANTITY))?,
        serial: cell_text(cell_at(raw, COL_SERIAL)),
    })
}

/// Encode a line as exactly 11 cells (column J stays blank).
pub fn encode_row(line: &OrderLine) -> RawRow {
    vec![
        match line.date {
            Some(d) => Cell::from(encode_date(d)),
            None => Cell::from(""),
        },
        Cell::from(line.branch.clone()),
        Cell::from(line.requested_by.clone()),
        Cell::from(line.product_code.clone()),
        Cell::from(line.product_name.clone()),
        decimal_cell(line.unit_price),
        decimal_cell(line.subtotal),
        Cell::from(line.category.clone()),
        Cell::from(line.quantity),
        Cell::from(""),
        Cell::from(line.serial.clone()),
    ]
}

/// 11 empty strings: what move-and-clear leaves behind.
pub fn clear_row() -> RawRow {
    vec![Cell::from(""); crate::store::SHEET_COLUMNS as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> RawRow {
        vec![
            json!("2026-08-07 10:30:00"),
            json!("Maadi"),
            json!("amr"),
            json!("P1"),
            json!("Juice"),
            json!(10),
            json!(30),
            json!("Drinks"),
            json!(3),
            json!(""),
            json!("AA1"),
        ]
    }

    #[test]
    fn test_roundtrip() {
        let raw = sample_row();
        let line = decode_row(&raw).expect("well-formed row");
        assert_eq!(encode_row(&line), raw);
    }

    #[test]
    fn test_decode_day_serial_date() {
        // 45292 days after 1899-12-30 is 2024-01-01
        let ts = decode_date(&json!(45292)).expect("day serial");
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(ts.time(), chrono::NaiveTime::MIN);

        // Day serials as text cells also count
        let ts = decode_date(&json!("45292")).expect("textual day serial");
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_decode_date_rejects_garbage() {
        assert_eq!(decode_date(&json!("")), None);
        assert_eq!(decode_date(&Cell::Null), None);
        assert_eq!(decode_date(&json!("not a date")), None);
        // A small number is not a day serial and not a parseable date
        assert_eq!(decode_date(&json!(42)), None);
    }

    #[test]
    fn test_month_window() {
        let now = "2026-08-07T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let same = "2026-08-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let prev = "2026-07-31T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
        let other_year = "2025-08-15T00:00:00Z".parse::<DateTime<Utc>>().unwrap();

        assert!(is_current_month(same, now));
        assert!(!is_current_month(prev, now));
        assert!(!is_current_month(other_year, now));
    }

    #[test]
    fn test_missing_trailing_cells_default() {
        let raw: RawRow = vec![json!("2026-08-07"), json!("Maadi")];
        let line = decode_row(&raw).expect("short row");
        assert_eq!(line.branch, "Maadi");
        assert_eq!(line.quantity, 0);
        assert_eq!(line.subtotal, Decimal::ZERO);
        assert_eq!(line.serial, "");
    }

    #[test]
    fn test_malformed_numeric_cell_is_error() {
        let mut raw = sample_row();
        raw[COL_UNIT_PRICE] = json!("ten pounds");
        assert!(decode_row(&raw).is_err());

        let mut raw = sample_row();
        raw[COL_QUANTITY] = json!(-2);
        assert!(decode_row(&raw).is_err());
    }

    #[test]
    fn test_decimal_cell_keeps_integers() {
        assert_eq!(decimal_cell(Decimal::from(30)), json!(30));
        assert_eq!(decimal_cell(Decimal::new(105, 1)), json!(10.5));
    }
}
