//! Export Formatter
//!
//! Flattens resolved [`Order`] aggregates into an 11-column xlsx workbook:
//! one row per order line, one blank separator row between orders. Pure
//! rendering; the selection of orders happens in the handlers.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::ledger::codec;
use crate::ledger::model::Order;
use crate::utils::{AppError, AppResult};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS: [&str; 11] = [
    "رقم الطلب",
    "الحالة",
    "الفرع",
    "مقدم الطلب",
    "تاريخ الطلب",
    "كود الصنف",
    "اسم الصنف",
    "التصنيف",
    "الكمية",
    "سعر الوحدة",
    "الإجمالي",
];

/// Render orders to xlsx bytes.
pub fn render_orders(orders: &[Order]) -> AppResult<Vec<u8>> {
    render(orders).map_err(|e| AppError::internal(format!("xlsx rendering failed: {e}")))
}

fn render(orders: &[Order]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("الطلبات")?;

    for (c, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }

    let mut row: u32 = 1;
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            // blank separator row between orders
            row += 1;
        }
        for line in &order.items {
            worksheet.write_string(row, 0, order.serial.as_str())?;
            worksheet.write_string(row, 1, order.status.label())?;
            worksheet.write_string(row, 2, line.branch.as_str())?;
            worksheet.write_string(row, 3, line.requested_by.as_str())?;
            let date = line.date.map(codec::encode_date).unwrap_or_default();
            worksheet.write_string(row, 4, date.as_str())?;
            worksheet.write_string(row, 5, line.product_code.as_str())?;
            worksheet.write_string(row, 6, line.product_name.as_str())?;
            worksheet.write_string(row, 7, line.category.as_str())?;
            worksheet.write_number(row, 8, line.quantity as f64)?;
            worksheet.write_number(row, 9, line.unit_price.to_f64().unwrap_or(0.0))?;
            worksheet.write_number(row, 10, line.subtotal.to_f64().unwrap_or(0.0))?;
            row += 1;
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer()
}
