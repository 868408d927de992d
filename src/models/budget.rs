//! Budget assignment model
//!
//! Tracks how much money the household has manually assigned this period to a
//! category, a savings goal or an asset.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::SubcategoryKey;
use super::ids::{AssetId, GoalId};
use super::money::Money;

/// What an assignment funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    #[default]
    Category,
    Goal,
    Asset,
}

/// A manual budget assignment for the current period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_name: Option<String>,
    pub assigned: Money,
    #[serde(default)]
    pub kind: AssignmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<GoalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<AssetId>,
}

impl Assignment {
    /// Assign money to a subcategory
    pub fn category(
        category_name: impl Into<String>,
        subcategory_name: impl Into<String>,
        assigned: Money,
    ) -> Self {
        Self {
            category_name: category_name.into(),
            subcategory_name: Some(subcategory_name.into()),
            assigned,
            kind: AssignmentKind::Category,
            goal_id: None,
            asset_id: None,
        }
    }

    /// Assign money towards a savings goal
    pub fn goal(goal_id: impl Into<GoalId>, assigned: Money) -> Self {
        Self {
            category_name: "Goals".to_string(),
            subcategory_name: None,
            assigned,
            kind: AssignmentKind::Goal,
            goal_id: Some(goal_id.into()),
            asset_id: None,
        }
    }

    /// Assign money towards an asset
    pub fn asset(asset_id: impl Into<AssetId>, assigned: Money) -> Self {
        Self {
            category_name: "Assets".to_string(),
            subcategory_name: None,
            assigned,
            kind: AssignmentKind::Asset,
            goal_id: None,
            asset_id: Some(asset_id.into()),
        }
    }

    /// The subcategory this assignment budgets for
    pub fn subcategory_key(&self) -> SubcategoryKey {
        SubcategoryKey::new(
            &self.category_name,
            self.subcategory_name
                .as_deref()
                .unwrap_or(&self.category_name),
        )
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.assigned.is_negative() {
            return Err(BudgetValidationError::NegativeBudget);
        }
        match self.kind {
            AssignmentKind::Goal if self.goal_id.is_none() => {
                Err(BudgetValidationError::MissingTarget("goal_id"))
            }
            AssignmentKind::Asset if self.asset_id.is_none() => {
                Err(BudgetValidationError::MissingTarget("asset_id"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AssignmentKind::Category => {
                write!(f, "{} assigned: {}", self.subcategory_key(), self.assigned)
            }
            AssignmentKind::Goal => write!(
                f,
                "goal {} assigned: {}",
                self.goal_id.as_ref().map(GoalId::as_str).unwrap_or("?"),
                self.assigned
            ),
            AssignmentKind::Asset => write!(
                f,
                "asset {} assigned: {}",
                self.asset_id.as_ref().map(AssetId::as_str).unwrap_or("?"),
                self.assigned
            ),
        }
    }
}

/// Validation errors for assignments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeBudget,
    MissingTarget(&'static str),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBudget => write!(f, "Assigned amount cannot be negative"),
            Self::MissingTarget(field) => write!(f, "Assignment is missing {}", field),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
