//! Combined health report
//!
//! Bundles the metrics, the optional budget score, goal interactions and the
//! recommendation list computed from one input file, optionally merged with a
//! computed budget summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::BudgetSummary;
use crate::services::frequency::to_monthly;

use super::budget_score::{BudgetScore, BudgetScoreInputs};
use super::health::{HealthInputs, HealthMetrics, HealthScorer};
use super::recommendations::{
    analyze_goal_interactions, recommend, GoalInteraction, Recommendation, RecommendationSignals,
};

/// Input file for a health report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthReportInput {
    #[serde(flatten)]
    pub inputs: HealthInputs,
    #[serde(default)]
    pub signals: RecommendationSignals,
    /// Present when the household also wants a budget score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetScoreInputs>,
}

impl HealthReportInput {
    /// Take income, spending, bills and the budget score from `summary`
    ///
    /// Period totals are converted to monthly amounts; balances, goals and
    /// signals are left as supplied.
    pub fn with_summary(mut self, summary: &BudgetSummary) -> Self {
        let frequency = summary.period.period_type.frequency();
        let spending = to_monthly(summary.spent, frequency);
        let essential = to_monthly(summary.essential_spent, frequency);

        self.inputs.income = to_monthly(summary.income, frequency);
        self.inputs.spending = spending;
        self.inputs.essential_spending = essential;
        self.inputs.discretionary_spending = spending - essential;
        self.inputs.bills = summary.bills;
        self.budget = Some(BudgetScoreInputs::from_summary(summary));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub reference_date: NaiveDate,
    pub metrics: HealthMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_score: Option<BudgetScore>,
    pub goal_interactions: Vec<GoalInteraction>,
    pub recommendations: Vec<Recommendation>,
}

impl HealthReport {
    pub fn generate(input: &HealthReportInput, reference_date: NaiveDate) -> Self {
        let metrics = HealthScorer::score(&input.inputs);
        let recommendations = recommend(&metrics, &input.inputs, &input.signals, reference_date);
        let goal_interactions =
            analyze_goal_interactions(&input.inputs, input.signals.monthly_savings, reference_date);

        Self {
            reference_date,
            budget_score: input.budget.as_ref().map(BudgetScore::compute),
            metrics,
            goal_interactions,
            recommendations,
        }
    }

    /// Goals whose funding would leave the emergency fund short
    pub fn goals_at_risk(&self) -> impl Iterator<Item = &GoalInteraction> {
        self.goal_interactions.iter().filter(|g| g.at_risk)
    }
}
