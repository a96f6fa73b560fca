//! A1-notation range addressing
//!
//! The store addresses cells as `'Sheet Name'!A2:K10`. [`RangeSpec`] keeps
//! the structured form so in-process implementations can slice rows without
//! re-parsing A1 strings; only the HTTP client renders the notation.

use super::{FIRST_DATA_ROW, SHEET_COLUMNS};

/// A rectangular cell range within one sheet. Columns and rows are 1-based;
/// an absent `end_row` leaves the range open-ended downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub sheet: String,
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: Option<u32>,
}

impl RangeSpec {
    pub fn new(
        sheet: impl Into<String>,
        start_col: u32,
        start_row: u32,
        end_col: u32,
        end_row: Option<u32>,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            start_col,
            start_row,
            end_col,
            end_row,
        }
    }

    /// All order data rows of a sheet: `A2:K` (open-ended, below the header).
    pub fn data_rows(sheet: impl Into<String>) -> Self {
        Self::new(sheet, 1, FIRST_DATA_ROW, SHEET_COLUMNS, None)
    }

    /// One full order row: `A{row}:K{row}`.
    pub fn row_span(sheet: impl Into<String>, row: u32) -> Self {
        Self::new(sheet, 1, row, SHEET_COLUMNS, Some(row))
    }

    /// A single cell.
    pub fn cell(sheet: impl Into<String>, col: u32, row: u32) -> Self {
        Self::new(sheet, col, row, col, Some(row))
    }

    /// One whole column from row 1 downwards, e.g. `A:A` for append scans.
    pub fn column(sheet: impl Into<String>, col: u32) -> Self {
        Self::new(sheet, col, 1, col, None)
    }

    /// Render as A1 notation, quoting the sheet name (`'Final Orders'!A2:K`).
    pub fn a1(&self) -> String {
        let start = format!("{}{}", col_letter(self.start_col), self.start_row);
        let end = match self.end_row {
            Some(r) => format!("{}{}", col_letter(self.end_col), r),
            None => col_letter(self.end_col),
        };
        format!("'{}'!{}:{}", self.sheet.replace('\'', "''"), start, end)
    }
}

/// Convert a 1-based column number to its letter (A=1, ..., Z=26, AA=27).
pub fn col_letter(col: u32) -> String {
    let mut name = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_letter() {
        assert_eq!(col_letter(1), "A");
        assert_eq!(col_letter(11), "K");
        assert_eq!(col_letter(26), "Z");
        assert_eq!(col_letter(27), "AA");
        assert_eq!(col_letter(52), "AZ");
    }

    #[test]
    fn test_a1_rendering() {
        assert_eq!(
            RangeSpec::data_rows("Final Orders").a1(),
            "'Final Orders'!A2:K"
        );
        assert_eq!(
            RangeSpec::row_span("Waiting for Approval", 7).a1(),
            "'Waiting for Approval'!A7:K7"
        );
        assert_eq!(RangeSpec::cell("Serial Numbers", 2, 2).a1(), "'Serial Numbers'!B2:B2");
        assert_eq!(RangeSpec::column("Cancelled Orders", 1).a1(), "'Cancelled Orders'!A1:A");
    }
}
