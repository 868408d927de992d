//! Recommendations and goal interactions
//!
//! Turns health metrics and a handful of extra signals into a short,
//! prioritized action list. Rules are evaluated in a fixed order and the
//! result is stably sorted by priority, so equal-priority items keep rule
//! order and the output is deterministic.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::health::{ratio, HealthInputs, HealthMetrics, MetricStatus};
use crate::models::{GoalId, GoalSummary, Money};

/// Most recommendations returned at once
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Unused retirement contribution room worth mentioning
pub const RETIREMENT_ROOM_THRESHOLD: Money = Money::from_cents(1_000_000);

/// Minimum emergency cover after funding a goal
pub const MIN_EMERGENCY_MONTHS: f64 = 3.0;

const ESSENTIAL_RATIO_LIMIT: f64 = 65.0;
const DEADLINE_HORIZON_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub title: String,
    pub detail: String,
}

impl Recommendation {
    fn new(priority: Priority, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            priority,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Signals beyond the health metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSignals {
    /// Contribution cap room left in retirement accounts this year
    pub retirement_cap_room: Money,
    pub goals_behind_schedule: usize,
    pub rebalancing_needed: bool,
    /// Expected savings per month, used to project goal funding
    pub monthly_savings: Money,
}

/// Build the prioritized recommendation list
pub fn recommend(
    metrics: &HealthMetrics,
    inputs: &HealthInputs,
    signals: &RecommendationSignals,
    reference: NaiveDate,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let Some(months) = metrics.emergency_fund.raw_value {
        match metrics.emergency_fund.status {
            MetricStatus::Concern => recs.push(Recommendation::new(
                Priority::High,
                "Build your emergency fund",
                format!("Savings cover {:.1} months of essentials; aim for at least 3", months),
            )),
            MetricStatus::Warning => recs.push(Recommendation::new(
                Priority::Medium,
                "Top up your emergency fund",
                format!("Savings cover {:.1} months of essentials; 6 is comfortable", months),
            )),
            MetricStatus::Good => {}
        }
    }

    let unpaid = inputs.bills.unpaid();
    if unpaid > 0 {
        recs.push(Recommendation::new(
            Priority::High,
            "Pay outstanding bills",
            format!("{} bills due this period have no payment yet", unpaid),
        ));
    }

    if let Some(goal) = nearest_goal_at_risk(&inputs.goals, inputs.liquid_balance, reference) {
        recs.push(Recommendation::new(
            Priority::High,
            format!("{} is at risk", goal.name),
            format!(
                "{} still needed by {} but only {} is available",
                goal.shortfall(),
                goal.deadline.map(|d| d.to_string()).unwrap_or_default(),
                inputs.liquid_balance
            ),
        ));
    }

    match metrics.savings_rate.status {
        MetricStatus::Concern => recs.push(Recommendation::new(
            Priority::High,
            "Increase your savings rate",
            format!("You are saving {} of income", metrics.savings_rate.value),
        )),
        MetricStatus::Warning => recs.push(Recommendation::new(
            Priority::Medium,
            "Nudge your savings rate up",
            format!("You are saving {}; 20% is the target", metrics.savings_rate.value),
        )),
        MetricStatus::Good => {}
    }

    if let Some(debt) = &metrics.debt_to_income {
        match debt.status {
            MetricStatus::Concern => recs.push(Recommendation::new(
                Priority::High,
                "Reduce debt",
                format!("Debt is {} annual income", debt.value),
            )),
            MetricStatus::Warning => recs.push(Recommendation::new(
                Priority::Medium,
                "Keep paying down debt",
                format!("Debt is {} annual income", debt.value),
            )),
            MetricStatus::Good => {}
        }
    }

    if metrics
        .spending_ratio
        .raw_value
        .is_some_and(|pct| pct > ESSENTIAL_RATIO_LIMIT)
    {
        recs.push(Recommendation::new(
            Priority::Medium,
            "Review essential spending",
            format!(
                "Essentials take {} of spending, leaving little room",
                metrics.spending_ratio.value
            ),
        ));
    }

    if signals.goals_behind_schedule > 0 {
        recs.push(Recommendation::new(
            Priority::Medium,
            "Catch up on savings goals",
            format!("{} goals are behind schedule", signals.goals_behind_schedule),
        ));
    }

    if signals.retirement_cap_room > RETIREMENT_ROOM_THRESHOLD {
        recs.push(Recommendation::new(
            Priority::Low,
            "Use your retirement contribution room",
            format!("{} of cap room is unused this year", signals.retirement_cap_room),
        ));
    }

    if signals.rebalancing_needed {
        recs.push(Recommendation::new(
            Priority::Low,
            "Rebalance investments",
            "Your allocation has drifted from its targets",
        ));
    }

    recs.sort_by_key(|r| r.priority);
    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

/// The open goal with the nearest deadline inside the next six months whose
/// shortfall exceeds the liquid balance
pub fn nearest_goal_at_risk<'a>(
    goals: &'a [GoalSummary],
    liquid_balance: Money,
    reference: NaiveDate,
) -> Option<&'a GoalSummary> {
    let horizon = reference.checked_add_months(Months::new(DEADLINE_HORIZON_MONTHS))?;
    goals
        .iter()
        .filter(|g| !g.is_completed)
        .filter(|g| {
            g.deadline
                .is_some_and(|d| d >= reference && d <= horizon)
        })
        .filter(|g| g.shortfall() > liquid_balance)
        .min_by_key(|g| g.deadline)
}

/// How funding one goal affects the emergency fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInteraction {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub deadline: NaiveDate,
    pub shortfall: Money,
    /// Projected liquid balance at the deadline, before funding the goal
    pub balance_before: Money,
    pub balance_after: Money,
    /// Emergency cover left after funding; `None` without essentials data
    pub emergency_months_after: Option<f64>,
    pub at_risk: bool,
}

/// Walk open goals in deadline order against a running liquid balance
///
/// Savings accumulate between consecutive deadlines and each goal's
/// shortfall is taken out of the running balance, so a goal that depletes
/// savings leaves less for the goals after it.
pub fn analyze_goal_interactions(
    inputs: &HealthInputs,
    monthly_savings: Money,
    reference: NaiveDate,
) -> Vec<GoalInteraction> {
    let mut goals: Vec<(&GoalSummary, NaiveDate)> = inputs
        .goals
        .iter()
        .filter(|g| !g.is_completed)
        .filter_map(|g| g.deadline.map(|d| (g, d)))
        .collect();
    goals.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));

    let mut balance = inputs.liquid_balance;
    let mut previous = reference;
    let mut interactions = Vec::with_capacity(goals.len());

    for (goal, deadline) in goals {
        let months = months_between(previous, deadline);
        previous = previous.max(deadline);

        let balance_before = balance + monthly_savings.mul_ratio(i64::from(months), 1);
        let shortfall = goal.shortfall();
        let balance_after = balance_before - shortfall;
        let emergency_months_after = ratio(balance_after, inputs.monthly_essentials);
        let at_risk = match emergency_months_after {
            Some(months) => months < MIN_EMERGENCY_MONTHS,
            None => balance_after.is_negative(),
        };
        if at_risk {
            tracing::debug!(goal = %goal.id, %balance_after, "goal funding erodes emergency fund");
        }

        interactions.push(GoalInteraction {
            goal_id: goal.id.clone(),
            goal_name: goal.name.clone(),
            deadline,
            shortfall,
            balance_before,
            balance_after,
            emergency_months_after,
            at_risk,
        });
        balance = balance_after;
    }
    interactions
}

/// Whole months from `from` to `to`, zero when `to` is not later
fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}
