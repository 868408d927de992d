//! Carryover between periods
//!
//! How much of the previous period's leftover rolls into this one. The policy
//! is a named strategy so call sites only ever ask for a [`CarryoverMode`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HearthError;
use crate::models::{Money, PreviousPeriodSnapshot};

/// A rollover policy
pub trait CarryoverStrategy {
    fn name(&self) -> &'static str;

    /// Amount carried into the next period
    fn carryover(&self, previous: &PreviousPeriodSnapshot) -> Money;
}

/// Every period starts fresh
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCarryover;

impl CarryoverStrategy for NoCarryover {
    fn name(&self) -> &'static str {
        "none"
    }

    fn carryover(&self, _previous: &PreviousPeriodSnapshot) -> Money {
        Money::zero()
    }
}

/// Surpluses roll forward, deficits do not
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveOnlyCarryover;

impl CarryoverStrategy for PositiveOnlyCarryover {
    fn name(&self) -> &'static str {
        "positive-only"
    }

    fn carryover(&self, previous: &PreviousPeriodSnapshot) -> Money {
        previous.leftover().max_zero()
    }
}

/// Surpluses and deficits both roll forward
#[derive(Debug, Clone, Copy, Default)]
pub struct FullCarryover;

impl CarryoverStrategy for FullCarryover {
    fn name(&self) -> &'static str {
        "full"
    }

    fn carryover(&self, previous: &PreviousPeriodSnapshot) -> Money {
        previous.leftover()
    }
}

/// Configured carryover policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CarryoverMode {
    #[default]
    None,
    PositiveOnly,
    Full,
}

impl CarryoverMode {
    pub fn strategy(&self) -> &'static dyn CarryoverStrategy {
        match self {
            Self::None => &NoCarryover,
            Self::PositiveOnly => &PositiveOnlyCarryover,
            Self::Full => &FullCarryover,
        }
    }

    /// Carryover from `previous`; no previous period means nothing to carry
    pub fn carryover(&self, previous: Option<&PreviousPeriodSnapshot>) -> Money {
        previous
            .map(|p| self.strategy().carryover(p))
            .unwrap_or_default()
    }
}

impl fmt::Display for CarryoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

impl FromStr for CarryoverMode {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" | "off" => Ok(Self::None),
            "positive-only" | "positive" => Ok(Self::PositiveOnly),
            "full" | "all" => Ok(Self::Full),
            other => Err(HearthError::Parse(format!("Unknown carryover mode: {}", other))),
        }
    }
}

/// To be budgeted: income + carryover - budgeted
pub fn to_be_budgeted(income: Money, carryover: Money, budgeted: Money) -> Money {
    income + carryover - budgeted
}
