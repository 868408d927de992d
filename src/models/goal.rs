//! Savings goals and assets
//!
//! Summaries only: the data layer owns balances and history, the engine reads
//! them to name rows and to score financial health.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, GoalId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub name: String,
    pub target: Money,
    #[serde(default)]
    pub current: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

impl GoalSummary {
    pub fn new(id: impl Into<GoalId>, name: impl Into<String>, target: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target,
            current: Money::zero(),
            deadline: None,
            is_completed: false,
        }
    }

    pub fn with_current(mut self, current: Money) -> Self {
        self.current = current;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Amount still needed to reach the target
    pub fn shortfall(&self) -> Money {
        (self.target - self.current).max_zero()
    }
}

/// Kind of asset, used to separate liquid savings from the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[default]
    Cash,
    Savings,
    Investment,
    Retirement,
    Property,
    Other,
}

impl AssetClass {
    pub fn is_liquid(&self) -> bool {
        matches!(self, Self::Cash | Self::Savings)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: AssetId,
    pub name: String,
    #[serde(default)]
    pub balance: Money,
    #[serde(default)]
    pub class: AssetClass,
}

impl AssetSummary {
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, class: AssetClass) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance: Money::zero(),
            class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_never_negative() {
        let goal = GoalSummary::new("g", "Car", Money::from_cents(1000))
            .with_current(Money::from_cents(1500));
        assert_eq!(goal.shortfall(), Money::zero());

        let goal = GoalSummary::new("g", "Car", Money::from_cents(1000))
            .with_current(Money::from_cents(400));
        assert_eq!(goal.shortfall(), Money::from_cents(600));
    }

    #[test]
    fn test_liquidity() {
        assert!(AssetClass::Savings.is_liquid());
        assert!(!AssetClass::Retirement.is_liquid());
    }
}
