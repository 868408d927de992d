//! Shared-expense split settings
//!
//! A split setting says how a cost is divided between the two partners. Its
//! scope says what it applies to: one expense definition, every expense in a
//! category, or everything by default.

use serde::{Deserialize, Serialize};

use super::ids::ExpenseId;

/// What a split setting applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum SplitScope {
    Expense { expense_id: ExpenseId },
    Category { category_name: String },
    Default,
}

/// How the cost is divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitType {
    Equal,
    Custom,
    IndividualOwner,
    IndividualPartner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSetting {
    #[serde(flatten)]
    pub scope: SplitScope,
    pub split_type: SplitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_percentage: Option<u8>,
}

impl SplitSetting {
    pub fn new(scope: SplitScope, split_type: SplitType) -> Self {
        Self {
            scope,
            split_type,
            owner_percentage: None,
        }
    }

    pub fn custom(scope: SplitScope, owner_percentage: u8) -> Self {
        Self {
            scope,
            split_type: SplitType::Custom,
            owner_percentage: Some(owner_percentage),
        }
    }

    /// The owner/partner division this setting describes
    ///
    /// A custom split without a percentage divides equally.
    pub fn shares(&self) -> SplitShares {
        match self.split_type {
            SplitType::Equal => SplitShares::from_owner(50),
            SplitType::Custom => SplitShares::from_owner(self.owner_percentage.unwrap_or(50)),
            SplitType::IndividualOwner => SplitShares::from_owner(100),
            SplitType::IndividualPartner => SplitShares::from_owner(0),
        }
    }
}

/// Owner and partner percentages; always sum to 100
///
/// Only built through [`SplitShares::from_owner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitShares {
    owner: u8,
    partner: u8,
}

impl SplitShares {
    /// Build from the owner's percentage, clamped to `0..=100`
    pub fn from_owner(owner: u8) -> Self {
        let owner = owner.min(100);
        Self {
            owner,
            partner: 100 - owner,
        }
    }

    /// Fully personal to the owner
    pub fn personal() -> Self {
        Self::from_owner(100)
    }

    pub fn owner(&self) -> u8 {
        self.owner
    }

    pub fn partner(&self) -> u8 {
        self.partner
    }

    /// True when both partners carry part of the cost
    pub fn is_shared(&self) -> bool {
        self.owner != 0 && self.partner != 0
    }
}
