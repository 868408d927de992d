//! Financial health metrics
//!
//! Independent indicators computed from period aggregates and a few
//! auxiliary balances. Each metric carries a display value, the raw number
//! behind it, a status band and a trend. Metrics whose denominator is zero
//! report a labelled fallback instead of a ratio.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{BillsPaid, GoalSummary, Money};

/// Status band of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Warning,
    Concern,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("good"),
            Self::Warning => f.write_str("warning"),
            Self::Concern => f.write_str("concern"),
        }
    }
}

/// Direction of a metric relative to its history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

/// One health indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub name: String,
    /// Human readable value, e.g. `23.5%` or `4.2 months`
    pub value: String,
    /// The number behind `value`; absent when it could not be computed
    pub raw_value: Option<f64>,
    pub status: MetricStatus,
    pub trend: Trend,
    pub status_label: String,
}

impl HealthMetric {
    fn new(name: &str, value: impl Into<String>, raw_value: Option<f64>, status: MetricStatus) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            raw_value,
            status,
            trend: Trend::Flat,
            status_label: default_label(status).to_string(),
        }
    }

    fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    fn labelled(mut self, label: impl Into<String>) -> Self {
        self.status_label = label.into();
        self
    }

    pub fn is_concern(&self) -> bool {
        self.status == MetricStatus::Concern
    }
}

fn default_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Good => "On track",
        MetricStatus::Warning => "Needs attention",
        MetricStatus::Concern => "Action needed",
    }
}

/// A dated net worth observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub value: Money,
}

/// Everything the health metrics are computed from
///
/// Income and spending amounts are monthly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthInputs {
    pub net_worth_history: Vec<NetWorthPoint>,
    pub income: Money,
    pub spending: Money,
    /// Savings rates (percent) of earlier periods, for the trend
    pub prior_savings_rates: Vec<f64>,
    pub liquid_balance: Money,
    pub monthly_essentials: Money,
    pub goals: Vec<GoalSummary>,
    pub essential_spending: Money,
    pub discretionary_spending: Money,
    pub bills: BillsPaid,
    pub debt_balance: Money,
    /// Defaults to twelve times the monthly income
    pub annual_income: Option<Money>,
}

impl HealthInputs {
    pub fn annual_income(&self) -> Money {
        self.annual_income
            .unwrap_or_else(|| self.income.mul_ratio(12, 1))
    }

    /// Liquid balance expressed in months of essential spending
    pub fn emergency_months(&self) -> Option<f64> {
        ratio(self.liquid_balance, self.monthly_essentials)
    }
}

pub(crate) fn ratio(numerator: Money, denominator: Money) -> Option<f64> {
    if denominator.is_positive() {
        Some(numerator.cents() as f64 / denominator.cents() as f64)
    } else {
        None
    }
}

/// `part` as a percentage of a positive `total`
fn percent_of(part: Money, total: Money) -> Option<f64> {
    if total.is_positive() {
        Some(part.cents() as f64 * 100.0 / total.cents() as f64)
    } else {
        None
    }
}

/// The full set of health metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub net_worth: HealthMetric,
    pub savings_rate: HealthMetric,
    pub emergency_fund: HealthMetric,
    pub goals_progress: HealthMetric,
    pub spending_ratio: HealthMetric,
    pub bills_payment: HealthMetric,
    /// Only present when there is debt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_to_income: Option<HealthMetric>,
}

impl HealthMetrics {
    pub fn all(&self) -> Vec<&HealthMetric> {
        let mut metrics = vec![
            &self.net_worth,
            &self.savings_rate,
            &self.emergency_fund,
            &self.goals_progress,
            &self.spending_ratio,
            &self.bills_payment,
        ];
        if let Some(debt) = &self.debt_to_income {
            metrics.push(debt);
        }
        metrics
    }
}

/// Computes [`HealthMetrics`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthScorer;

impl HealthScorer {
    pub fn score(inputs: &HealthInputs) -> HealthMetrics {
        HealthMetrics {
            net_worth: net_worth_trend(&inputs.net_worth_history),
            savings_rate: savings_rate(inputs.income, inputs.spending, &inputs.prior_savings_rates),
            emergency_fund: emergency_fund(inputs),
            goals_progress: goals_progress(&inputs.goals),
            spending_ratio: spending_ratio(inputs.essential_spending, inputs.discretionary_spending),
            bills_payment: bills_payment(inputs.bills),
            debt_to_income: debt_to_income(inputs.debt_balance, inputs.annual_income()),
        }
    }
}

/// Compare the latest against the earliest observation; under 1% is flat
pub fn net_worth_trend(history: &[NetWorthPoint]) -> HealthMetric {
    let earliest = history.iter().min_by_key(|p| p.date);
    let latest = history.iter().max_by_key(|p| p.date);
    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return HealthMetric::new("Net worth", "N/A", None, MetricStatus::Warning)
            .labelled("Insufficient data");
    };
    if history.len() < 2 {
        return HealthMetric::new(
            "Net worth",
            latest.value.to_string(),
            Some(latest.value.as_units()),
            MetricStatus::Warning,
        )
        .labelled("Insufficient data");
    }

    let delta = (latest.value - earliest.value).cents();
    let baseline = earliest.value.cents().abs();
    let trend = if (delta.abs() as i128) * 100 < baseline as i128 || delta == 0 {
        Trend::Flat
    } else if delta > 0 {
        Trend::Up
    } else {
        Trend::Down
    };
    let status = match trend {
        Trend::Up => MetricStatus::Good,
        Trend::Flat => MetricStatus::Warning,
        Trend::Down => MetricStatus::Concern,
    };
    let label = match trend {
        Trend::Up => "Growing",
        Trend::Flat => "Holding steady",
        Trend::Down => "Shrinking",
    };
    HealthMetric::new(
        "Net worth",
        latest.value.to_string(),
        Some(latest.value.as_units()),
        status,
    )
    .with_trend(trend)
    .labelled(label)
}

/// (income - spending) / income, never below zero
pub fn savings_rate(income: Money, spending: Money, prior_rates: &[f64]) -> HealthMetric {
    let Some(rate) = percent_of(income - spending, income) else {
        return HealthMetric::new("Savings rate", "0%", Some(0.0), MetricStatus::Concern)
            .labelled("No income recorded");
    };
    let rate = rate.max(0.0);
    let status = if rate >= 20.0 {
        MetricStatus::Good
    } else if rate >= 10.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };

    let trend = if prior_rates.is_empty() {
        Trend::Flat
    } else {
        let average = prior_rates.iter().sum::<f64>() / prior_rates.len() as f64;
        if rate > average + 2.0 {
            Trend::Up
        } else if rate < average - 2.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    };

    HealthMetric::new("Savings rate", format!("{:.1}%", rate), Some(rate), status).with_trend(trend)
}

pub fn emergency_fund(inputs: &HealthInputs) -> HealthMetric {
    let Some(months) = inputs.emergency_months() else {
        return HealthMetric::new("Emergency fund", "N/A", None, MetricStatus::Warning)
            .labelled("Insufficient data");
    };
    let status = if months >= 6.0 {
        MetricStatus::Good
    } else if months >= 3.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };
    HealthMetric::new(
        "Emergency fund",
        format!("{:.1} months", months),
        Some(months),
        status,
    )
}

/// Saved over target across goals that are still open
pub fn goals_progress(goals: &[GoalSummary]) -> HealthMetric {
    let active: Vec<&GoalSummary> = goals.iter().filter(|g| !g.is_completed).collect();
    let target: Money = active.iter().map(|g| g.target).sum();
    let current: Money = active.iter().map(|g| g.current).sum();

    let Some(pct) = percent_of(current, target) else {
        return HealthMetric::new("Goals progress", "N/A", None, MetricStatus::Good)
            .labelled("No active goals");
    };
    let status = if pct >= 50.0 {
        MetricStatus::Good
    } else if pct >= 25.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };
    HealthMetric::new("Goals progress", format!("{:.0}%", pct), Some(pct), status)
}

/// Essential share of total spending
pub fn spending_ratio(essential: Money, discretionary: Money) -> HealthMetric {
    let total = essential + discretionary;
    let Some(pct) = percent_of(essential, total) else {
        return HealthMetric::new("Essential spending", "N/A", None, MetricStatus::Warning)
            .labelled("Insufficient data");
    };
    let status = if pct < 50.0 {
        MetricStatus::Good
    } else if pct <= 65.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };
    HealthMetric::new("Essential spending", format!("{:.0}%", pct), Some(pct), status)
}

pub fn bills_payment(bills: BillsPaid) -> HealthMetric {
    if bills.tracked == 0 {
        return HealthMetric::new("Bills paid", "N/A", None, MetricStatus::Good)
            .labelled("No bills tracked");
    }
    let pct = bills.paid as f64 / bills.tracked as f64 * 100.0;
    let status = if pct >= 90.0 {
        MetricStatus::Good
    } else if pct >= 70.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };
    HealthMetric::new(
        "Bills paid",
        format!("{}/{}", bills.paid, bills.tracked),
        Some(pct),
        status,
    )
}

/// Debt over annual income; `None` without debt
pub fn debt_to_income(debt: Money, annual_income: Money) -> Option<HealthMetric> {
    if !debt.is_positive() {
        return None;
    }
    let Some(multiple) = ratio(debt, annual_income) else {
        return Some(
            HealthMetric::new("Debt to income", "N/A", None, MetricStatus::Concern)
                .labelled("No income recorded"),
        );
    };
    let status = if multiple < 3.0 {
        MetricStatus::Good
    } else if multiple <= 5.0 {
        MetricStatus::Warning
    } else {
        MetricStatus::Concern
    };
    Some(HealthMetric::new(
        "Debt to income",
        format!("{:.1}x", multiple),
        Some(multiple),
        status,
    ))
}
