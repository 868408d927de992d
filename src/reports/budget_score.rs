//! Budget health score
//!
//! A composite 0-100 score made of five components worth 20 points each.
//! Components that are not fully met earn partial credit in proportion.

use serde::{Deserialize, Serialize};

use crate::models::money::round_div;
use crate::models::{BillsPaid, BudgetSummary, Money, RowKind};

const COMPONENT_POINTS: i64 = 20;

/// Counts and totals the score is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetScoreInputs {
    pub income: Money,
    pub budgeted: Money,
    pub tbb: Money,
    /// Subcategory rows with money assigned
    pub categories_assigned: usize,
    /// Of those, rows whose spending stayed within the assignment
    pub categories_within: usize,
    pub bills: BillsPaid,
    pub rows_total: usize,
    pub rows_negative: usize,
}

impl BudgetScoreInputs {
    /// Read every count off a computed summary
    pub fn from_summary(summary: &BudgetSummary) -> Self {
        let assigned: Vec<_> = summary
            .rows
            .iter()
            .filter(|r| r.kind == RowKind::Subcategory && r.budgeted.is_positive())
            .collect();
        Self {
            income: summary.income,
            budgeted: summary.budgeted,
            tbb: summary.tbb,
            categories_assigned: assigned.len(),
            categories_within: assigned.iter().filter(|r| r.spent <= r.budgeted).count(),
            bills: summary.bills,
            rows_total: summary.rows.len(),
            rows_negative: summary.overspent_rows().count(),
        }
    }
}

/// One scored component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    pub points: u8,
    pub max_points: u8,
    pub detail: String,
}

impl ScoreComponent {
    fn new(name: &str, points: i64, detail: String) -> Self {
        Self {
            name: name.to_string(),
            points: points.clamp(0, COMPONENT_POINTS) as u8,
            max_points: COMPONENT_POINTS as u8,
            detail,
        }
    }

    pub fn is_full(&self) -> bool {
        self.points == self.max_points
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetScore {
    pub score: u8,
    pub components: Vec<ScoreComponent>,
}

impl BudgetScore {
    pub fn compute(inputs: &BudgetScoreInputs) -> Self {
        let components = vec![
            fully_assigned(inputs),
            within_assignment(inputs),
            bills_on_time(inputs),
            income_assigned(inputs),
            no_negative_rows(inputs),
        ];
        let score = components.iter().map(|c| u32::from(c.points)).sum::<u32>();
        Self {
            score: score.min(100) as u8,
            components,
        }
    }
}

/// Points for `part` out of `whole`, with an empty whole counting as met
fn proportional(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return COMPONENT_POINTS;
    }
    round_div(
        part as i128 * i128::from(COMPONENT_POINTS),
        whole as i128,
    ) as i64
}

fn fully_assigned(inputs: &BudgetScoreInputs) -> ScoreComponent {
    let points = if inputs.tbb.is_zero() { COMPONENT_POINTS } else { 0 };
    ScoreComponent::new(
        "Every dollar assigned",
        points,
        format!("{} left to budget", inputs.tbb),
    )
}

fn within_assignment(inputs: &BudgetScoreInputs) -> ScoreComponent {
    ScoreComponent::new(
        "Categories within budget",
        proportional(inputs.categories_within, inputs.categories_assigned),
        format!(
            "{} of {} categories",
            inputs.categories_within, inputs.categories_assigned
        ),
    )
}

fn bills_on_time(inputs: &BudgetScoreInputs) -> ScoreComponent {
    ScoreComponent::new(
        "Bills paid on time",
        proportional(inputs.bills.paid, inputs.bills.tracked),
        format!("{} of {} bills", inputs.bills.paid, inputs.bills.tracked),
    )
}

/// Full marks from 90% of income assigned, scaled below that
fn income_assigned(inputs: &BudgetScoreInputs) -> ScoreComponent {
    let points = if inputs.income.is_positive() {
        round_div(
            i128::from(inputs.budgeted.cents()) * 100 * i128::from(COMPONENT_POINTS),
            i128::from(inputs.income.cents()) * 90,
        ) as i64
    } else {
        0
    };
    ScoreComponent::new(
        "Income assigned",
        points,
        format!("{} of {} income", inputs.budgeted, inputs.income),
    )
}

fn no_negative_rows(inputs: &BudgetScoreInputs) -> ScoreComponent {
    let healthy = inputs.rows_total.saturating_sub(inputs.rows_negative);
    ScoreComponent::new(
        "No overspent categories",
        proportional(healthy, inputs.rows_total),
        format!("{} overspent", inputs.rows_negative),
    )
}
