//! Health report formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_bar, format_header, format_money};
use crate::reports::{BudgetScore, HealthMetric, HealthReport};

#[derive(Tabled)]
struct MetricLine {
    #[tabled(rename = "Metric")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Note")]
    label: String,
}

impl From<&HealthMetric> for MetricLine {
    fn from(metric: &HealthMetric) -> Self {
        Self {
            name: metric.name.clone(),
            value: metric.value.clone(),
            status: metric.status.to_string(),
            trend: metric.trend.to_string(),
            label: metric.status_label.clone(),
        }
    }
}

#[derive(Tabled)]
struct GoalLine {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Shortfall")]
    shortfall: String,
    #[tabled(rename = "Balance after")]
    balance_after: String,
    #[tabled(rename = "Cover after")]
    cover: String,
    #[tabled(rename = "At risk")]
    at_risk: String,
}

/// Format the budget score with one bar per component
pub fn format_budget_score(score: &BudgetScore) -> String {
    let mut output = format_header(&format!("Budget score: {}/100", score.score));
    for component in &score.components {
        output.push_str(&format!(
            "{:<26} {} {:>2}/{}  {}\n",
            component.name,
            format_bar(f64::from(component.points), f64::from(component.max_points), 10),
            component.points,
            component.max_points,
            component.detail
        ));
    }
    output
}

/// Format a full health report
pub fn format_health_report(report: &HealthReport, symbol: &str) -> String {
    let mut output = format_header(&format!("Financial health as of {}", report.reference_date));

    let lines: Vec<MetricLine> = report.metrics.all().into_iter().map(MetricLine::from).collect();
    let mut table = Table::new(lines);
    table.with(Style::rounded());
    output.push_str(&table.to_string());
    output.push('\n');

    if let Some(score) = &report.budget_score {
        output.push('\n');
        output.push_str(&format_budget_score(score));
    }

    if !report.goal_interactions.is_empty() {
        output.push('\n');
        output.push_str(&format_header("Goal funding"));
        let lines: Vec<GoalLine> = report
            .goal_interactions
            .iter()
            .map(|g| GoalLine {
                name: g.goal_name.clone(),
                deadline: g.deadline.to_string(),
                shortfall: format_money(g.shortfall, symbol),
                balance_after: format_money(g.balance_after, symbol),
                cover: g
                    .emergency_months_after
                    .map(|m| format!("{:.1} months", m))
                    .unwrap_or_else(|| "N/A".to_string()),
                at_risk: if g.at_risk { "yes" } else { "no" }.to_string(),
            })
            .collect();
        let mut table = Table::new(lines);
        table.with(Style::rounded());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_header("Recommendations"));
    if report.recommendations.is_empty() {
        output.push_str("Nothing to act on right now.\n");
    }
    for (i, rec) in report.recommendations.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}] {}\n   {}\n",
            i + 1,
            rec.priority,
            rec.title,
            rec.detail
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalSummary, Money};
    use crate::reports::{BudgetScoreInputs, HealthInputs, HealthReportInput};
    use chrono::NaiveDate;

    fn report(input: &HealthReportInput) -> HealthReport {
        HealthReport::generate(input, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn test_format_health_report() {
        let input = HealthReportInput {
            inputs: HealthInputs {
                income: Money::from_cents(500_000),
                spending: Money::from_cents(450_000),
                liquid_balance: Money::from_cents(300_000),
                monthly_essentials: Money::from_cents(300_000),
                goals: vec![GoalSummary::new("trip", "Trip", Money::from_cents(800_000))
                    .with_deadline(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())],
                ..HealthInputs::default()
            },
            budget: Some(BudgetScoreInputs::default()),
            ..HealthReportInput::default()
        };
        let output = format_health_report(&report(&input), "$");

        assert!(output.starts_with("Financial health as of 2026-03-01\n"));
        assert!(output.contains("Savings rate"));
        assert!(output.contains("Budget score: 80/100"));
        assert!(output.contains("Goal funding"));
        assert!(output.contains("-$5000.00"));
        assert!(output.contains("1. [high] Build your emergency fund"));
    }

    #[test]
    fn test_no_recommendations() {
        let input = HealthReportInput {
            inputs: HealthInputs {
                income: Money::from_cents(500_000),
                spending: Money::from_cents(300_000),
                liquid_balance: Money::from_cents(2_000_000),
                monthly_essentials: Money::from_cents(300_000),
                ..HealthInputs::default()
            },
            ..HealthReportInput::default()
        };
        let output = format_health_report(&report(&input), "$");
        assert!(output.contains("Nothing to act on right now."));
        assert!(!output.contains("Budget score"));
        assert!(!output.contains("Goal funding"));
    }
}
