//! Input snapshots
//!
//! The engine never fetches anything. Callers materialize every input for a
//! computation into a [`BudgetSnapshot`] taken at a single point in time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::budget::Assignment;
use super::category::{CategoryDisplay, CategoryMapping};
use super::expense::ExpenseDefinition;
use super::goal::{AssetSummary, GoalSummary};
use super::ids::{AssetId, GoalId};
use super::income::IncomeSource;
use super::money::Money;
use super::split::{SplitScope, SplitSetting, SplitType};
use super::transaction::Transaction;
use crate::error::{HearthError, HearthResult};

/// Whose numbers a summary reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// The requesting user's own share only
    Individual,
    /// The whole household
    #[default]
    Shared,
}

impl ReportMode {
    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Individual)
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.write_str("individual"),
            Self::Shared => f.write_str("shared"),
        }
    }
}

impl FromStr for ReportMode {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" | "personal" | "mine" => Ok(Self::Individual),
            "shared" | "household" | "joint" => Ok(Self::Shared),
            other => Err(HearthError::Parse(format!("Unknown report mode: {}", other))),
        }
    }
}

/// Everything one budget computation reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSnapshot {
    pub income_sources: Vec<IncomeSource>,
    pub assignments: Vec<Assignment>,
    pub transactions: Vec<Transaction>,
    pub expenses: Vec<ExpenseDefinition>,
    pub split_settings: Vec<SplitSetting>,
    pub category_mappings: Vec<CategoryMapping>,
    pub goals: Vec<GoalSummary>,
    pub assets: Vec<AssetSummary>,
    /// Contributions made this period, per goal
    pub goal_contributions: BTreeMap<GoalId, Money>,
    /// Contributions made this period, per asset
    pub asset_contributions: BTreeMap<AssetId, Money>,
    /// Subcategories that always get a row, even when empty
    pub display_categories: Vec<CategoryDisplay>,
}

impl BudgetSnapshot {
    /// Combined balance of cash and savings assets
    pub fn liquid_balance(&self) -> Money {
        self.assets
            .iter()
            .filter(|a| a.class.is_liquid())
            .map(|a| a.balance)
            .sum()
    }

    /// Check the snapshot for values the data layer should never produce
    ///
    /// The engine tolerates all of these; validation exists so the binary can
    /// reject bad input files with a clear message.
    pub fn validate(&self) -> HearthResult<()> {
        for assignment in &self.assignments {
            assignment
                .validate()
                .map_err(|e| HearthError::Validation(format!("{}: {}", assignment, e)))?;
        }

        for source in &self.income_sources {
            source.validate().map_err(|e| {
                HearthError::Validation(format!("income for {}: {}", source.owner_id, e))
            })?;
        }

        for setting in &self.split_settings {
            if let Some(pct) = setting.owner_percentage {
                if pct > 100 {
                    return Err(HearthError::Validation(format!(
                        "split owner percentage {} is above 100",
                        pct
                    )));
                }
            }
            if setting.split_type == SplitType::Custom && setting.owner_percentage.is_none() {
                tracing::debug!(scope = ?setting.scope, "custom split without percentage");
            }
        }

        let defaults = self
            .split_settings
            .iter()
            .filter(|s| s.scope == SplitScope::Default)
            .count();
        if defaults > 1 {
            return Err(HearthError::Validation(format!(
                "{} default split settings; expected at most one",
                defaults
            )));
        }

        for txn in &self.transactions {
            if let Some(pct) = txn.split_override_percentage {
                if pct > 100 {
                    return Err(HearthError::Validation(format!(
                        "transaction {} override percentage {} is above 100",
                        txn.id, pct
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Totals carried forward from the previous period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousPeriodSnapshot {
    pub income: Money,
    pub budgeted: Money,
    pub spent: Money,
    pub carryover: Money,
}

impl PreviousPeriodSnapshot {
    /// Money left over at the end of the previous period
    pub fn leftover(&self) -> Money {
        self.income + self.carryover - self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetClass, Frequency};

    #[test]
    fn test_report_mode_parse() {
        assert_eq!("Individual".parse::<ReportMode>().unwrap(), ReportMode::Individual);
        assert_eq!("household".parse::<ReportMode>().unwrap(), ReportMode::Shared);
        assert!("everyone".parse::<ReportMode>().is_err());
    }

    #[test]
    fn test_empty_snapshot_deserializes() {
        let snapshot: BudgetSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.assignments.is_empty());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_assignment() {
        let snapshot = BudgetSnapshot {
            assignments: vec![Assignment::category("Food", "Groceries", Money::from_cents(-1))],
            ..Default::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_bad_percentages() {
        let snapshot = BudgetSnapshot {
            split_settings: vec![SplitSetting::custom(SplitScope::Default, 120)],
            ..Default::default()
        };
        assert!(snapshot.validate().is_err());

        let snapshot = BudgetSnapshot {
            income_sources: vec![IncomeSource::recurring(
                "a",
                Money::from_cents(100),
                Frequency::Monthly,
            )],
            split_settings: vec![
                SplitSetting::new(SplitScope::Default, SplitType::Equal),
                SplitSetting::new(SplitScope::Default, SplitType::Equal),
            ],
            ..Default::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_liquid_balance_counts_cash_and_savings() {
        let asset = |id: &str, class, cents| {
            let mut asset = AssetSummary::new(id, id, class);
            asset.balance = Money::from_cents(cents);
            asset
        };
        let snapshot = BudgetSnapshot {
            assets: vec![
                asset("wallet", AssetClass::Cash, 20_000),
                asset("hisa", AssetClass::Savings, 1_500_000),
                asset("super", AssetClass::Retirement, 9_000_000),
            ],
            ..Default::default()
        };
        assert_eq!(snapshot.liquid_balance(), Money::from_cents(1_520_000));
    }

    #[test]
    fn test_leftover() {
        let prev = PreviousPeriodSnapshot {
            income: Money::from_cents(5000),
            budgeted: Money::from_cents(4000),
            spent: Money::from_cents(3500),
            carryover: Money::from_cents(200),
        };
        assert_eq!(prev.leftover(), Money::from_cents(1700));
    }
}
