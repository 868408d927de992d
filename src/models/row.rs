//! Budget rows and the period summary
//!
//! A [`BudgetRow`] is one line of the reconciled budget. A [`BudgetSummary`]
//! is the full output of one summary computation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::PeriodRange;

/// What a row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Subcategory,
    Goal,
    Asset,
}

/// How spending compares to what was assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    /// Nothing assigned
    None,
    /// Below 95% of assigned
    Under,
    /// From 95% up to (not including) 100%
    At,
    /// At or beyond 100%
    Over,
}

impl CategoryStatus {
    pub fn from_amounts(spent: Money, assigned: Money) -> Self {
        if assigned.cents() <= 0 {
            return Self::None;
        }
        // Basis points of the assigned amount, in integer arithmetic
        let bps = spent.cents() as i128 * 10_000 / assigned.cents() as i128;
        if bps < 9_500 {
            Self::Under
        } else if bps < 10_000 {
            Self::At
        } else {
            Self::Over
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Under => "under",
            Self::At => "at",
            Self::Over => "over",
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconciled budget line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRow {
    /// Stable composite key, unique within one result
    pub id: String,
    pub kind: RowKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<String>,
    pub budgeted: Money,
    pub spent: Money,
    pub available: Money,
    pub status: CategoryStatus,
    /// Budgeted amount came from a recurring expense rather than the user
    pub is_expense_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shared: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_percentage: Option<u8>,
}

impl BudgetRow {
    pub fn new(
        id: impl Into<String>,
        kind: RowKind,
        name: impl Into<String>,
        budgeted: Money,
        spent: Money,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            parent_category: None,
            budgeted,
            spent,
            available: budgeted - spent,
            status: CategoryStatus::from_amounts(spent, budgeted),
            is_expense_default: false,
            is_shared: None,
            share_percentage: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_category = Some(parent.into());
        self
    }

    pub fn as_expense_default(mut self) -> Self {
        self.is_expense_default = true;
        self
    }

    /// Record the requesting user's share of a split row
    pub fn with_share(mut self, share_percentage: Option<u8>) -> Self {
        if let Some(pct) = share_percentage {
            self.is_shared = Some(0 < pct && pct < 100);
            self.share_percentage = Some(pct);
        }
        self
    }

    pub fn is_overspent(&self) -> bool {
        self.available.is_negative()
    }
}

/// An explanation block for how one summary figure was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodologySection {
    pub title: String,
    pub lines: Vec<String>,
}

impl MethodologySection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Bills due in a period and how many of them were paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillsPaid {
    pub paid: usize,
    pub tracked: usize,
}

impl BillsPaid {
    pub fn all_paid(&self) -> bool {
        self.paid == self.tracked
    }

    pub fn unpaid(&self) -> usize {
        self.tracked.saturating_sub(self.paid)
    }
}

/// Totals and rows for one budget period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub period: PeriodRange,
    pub income: Money,
    pub budgeted: Money,
    pub spent: Money,
    pub carryover: Money,
    /// To be budgeted: income + carryover - budgeted
    pub tbb: Money,
    pub rows: Vec<BudgetRow>,
    /// Part of `spent` in subcategories seeded by essential expenses
    #[serde(default)]
    pub essential_spent: Money,
    #[serde(default)]
    pub bills: BillsPaid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology_sections: Option<Vec<MethodologySection>>,
}

impl BudgetSummary {
    /// Rows whose spending exceeded the budget
    pub fn overspent_rows(&self) -> impl Iterator<Item = &BudgetRow> {
        self.rows.iter().filter(|r| r.is_overspent())
    }

    pub fn row(&self, id: &str) -> Option<&BudgetRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(CategoryStatus::from_amounts(cents(500), cents(0)), CategoryStatus::None);
        assert_eq!(CategoryStatus::from_amounts(cents(9499), cents(10000)), CategoryStatus::Under);
        assert_eq!(CategoryStatus::from_amounts(cents(9500), cents(10000)), CategoryStatus::At);
        assert_eq!(CategoryStatus::from_amounts(cents(9999), cents(10000)), CategoryStatus::At);
        assert_eq!(CategoryStatus::from_amounts(cents(10000), cents(10000)), CategoryStatus::Over);
        assert_eq!(CategoryStatus::from_amounts(cents(0), cents(10000)), CategoryStatus::Under);
    }

    #[test]
    fn test_row_available() {
        let row = BudgetRow::new("sub:food:groceries", RowKind::Subcategory, "Groceries", cents(100), cents(150));
        assert_eq!(row.available, cents(-50));
        assert!(row.is_overspent());
        assert_eq!(row.status, CategoryStatus::Over);
    }

    #[test]
    fn test_with_share() {
        let row = BudgetRow::new("x", RowKind::Subcategory, "X", cents(0), cents(0)).with_share(Some(70));
        assert_eq!(row.is_shared, Some(true));
        assert_eq!(row.share_percentage, Some(70));

        let row = BudgetRow::new("x", RowKind::Subcategory, "X", cents(0), cents(0)).with_share(None);
        assert_eq!(row.is_shared, None);
    }

    #[test]
    fn test_with_share_whole_or_nothing_is_not_shared() {
        let row = |pct| BudgetRow::new("x", RowKind::Subcategory, "X", cents(0), cents(0)).with_share(Some(pct));
        assert_eq!(row(0).is_shared, Some(false));
        assert_eq!(row(100).is_shared, Some(false));
        assert_eq!(row(0).share_percentage, Some(0));
    }

    #[test]
    fn test_bills_unpaid() {
        let bills = BillsPaid { paid: 3, tracked: 4 };
        assert_eq!(bills.unpaid(), 1);
        assert!(!bills.all_paid());
        assert!(BillsPaid::default().all_paid());
    }
}
