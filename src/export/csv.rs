//! CSV export of budget rows
//!
//! One record per row, amounts as plain decimals so spreadsheets can sum
//! them.

use crate::error::HearthResult;
use crate::models::{BudgetRow, BudgetSummary, CategoryStatus, Money, RowKind};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct RowRecord<'a> {
    period: &'a str,
    id: &'a str,
    kind: RowKind,
    parent: &'a str,
    name: &'a str,
    budgeted: String,
    spent: String,
    available: String,
    status: CategoryStatus,
    expense_default: bool,
    share_percentage: Option<u8>,
}

impl<'a> RowRecord<'a> {
    fn new(period: &'a str, row: &'a BudgetRow) -> Self {
        Self {
            period,
            id: &row.id,
            kind: row.kind,
            parent: row.parent_category.as_deref().unwrap_or(""),
            name: &row.name,
            budgeted: decimal(row.budgeted),
            spent: decimal(row.spent),
            available: decimal(row.available),
            status: row.status,
            expense_default: row.is_expense_default,
            share_percentage: row.share_percentage,
        }
    }
}

fn decimal(amount: Money) -> String {
    amount.format_with_symbol("")
}

/// Export the rows of a summary to CSV
pub fn export_rows_csv<W: Write>(summary: &BudgetSummary, writer: W) -> HearthResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &summary.rows {
        wtr.serialize(RowRecord::new(&summary.period.label, row))?;
    }
    wtr.flush()?;
    Ok(())
}
