//! Aggregation and reporting over scan results
//!
//! Pure functions: the ledger scans, this module groups. Lines group into
//! [`Order`] aggregates by serial; legacy lines with a blank serial fall
//! back to one pseudo-order per branch.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ledger::manager::ScanRow;
use crate::ledger::model::{BranchSummary, Order, OrderStatus};
use crate::utils::messages;

#[derive(Debug, Default)]
struct OrderAcc {
    serial: String,
    branch: String,
    requesters: BTreeSet<String>,
    created_at: Option<DateTime<Utc>>,
    total: Decimal,
    items: Vec<crate::ledger::model::OrderLine>,
}

impl OrderAcc {
    fn push(&mut self, row: &ScanRow) {
        let line = &row.line;
        if !line.requested_by.is_empty() {
            self.requesters.insert(line.requested_by.clone());
        }
        self.created_at = match (self.created_at, line.date) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.total += line.subtotal;
        self.items.push(line.clone());
    }

    fn into_order(self, status: OrderStatus) -> Order {
        let requested_by = match self.requesters.len() {
            0 => String::new(),
            1 => self.requesters.into_iter().next().unwrap_or_default(),
            _ => messages::MULTIPLE_REQUESTERS.to_string(),
        };
        Order {
            serial: self.serial,
            branch_name: self.branch,
            status,
            requested_by,
            created_at: self.created_at,
            total: self.total,
            items: self.items,
        }
    }
}

/// Group scanned lines into order aggregates. Lines sharing a serial form
/// one order; blank-serial lines form one pseudo-order per branch.
pub fn group_orders(rows: &[ScanRow], status: OrderStatus) -> Vec<Order> {
    let mut groups: BTreeMap<String, OrderAcc> = BTreeMap::new();

    for row in rows {
        let line = &row.line;
        let key = if line.serial.is_empty() {
            format!("\u{0}branch:{}", line.branch)
        } else {
            line.serial.clone()
        };
        let acc = groups.entry(key).or_insert_with(|| OrderAcc {
            serial: line.serial.clone(),
            branch: line.branch.clone(),
            ..OrderAcc::default()
        });
        acc.push(row);
    }

    groups.into_values().map(|acc| acc.into_order(status)).collect()
}

/// Branch totals of Waiting lines (the L2 approvals dashboard).
pub fn branch_summary(rows: &[ScanRow]) -> Vec<BranchSummary> {
    let mut groups: BTreeMap<String, BranchSummary> = BTreeMap::new();

    for row in rows {
        let line = &row.line;
        let entry = groups
            .entry(line.branch.clone())
            .or_insert_with(|| BranchSummary {
                branch_name: line.branch.clone(),
                total_amount: Decimal::ZERO,
                total_qty: 0,
                line_count: 0,
            });
        entry.total_amount += line.subtotal;
        entry.total_qty += line.quantity;
        entry.line_count += 1;
    }

    groups.into_values().collect()
}

/// All-status summary: every sheet's orders keyed by `(serial, status)`,
/// duplicate keys merged by summing totals and unioning requester sets.
pub fn status_summary(scans: &[(OrderStatus, Vec<ScanRow>)]) -> Vec<Order> {
    let mut merged: BTreeMap<(String, &'static str), Order> = BTreeMap::new();

    for (status, rows) in scans {
        for order in group_orders(rows, *status) {
            let key = (
                if order.serial.is_empty() {
                    format!("\u{0}branch:{}", order.branch_name)
                } else {
                    order.serial.clone()
                },
                status.label(),
            );
            match merged.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(order);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    existing.total += order.total;
                    if existing.requested_by != order.requested_by {
                        existing.requested_by = messages::MULTIPLE_REQUESTERS.to_string();
                    }
                    existing.created_at = match (existing.created_at, order.created_at) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    };
                    existing.items.extend(order.items);
                }
            }
        }
    }

    merged.into_values().collect()
}
