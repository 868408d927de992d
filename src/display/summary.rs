//! Budget summary and period formatting

use chrono_tz::Tz;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_header, format_money, label_value};
use crate::models::{BudgetRow, BudgetSummary, PeriodRange};
use crate::services::calendar::components_in_zone;

#[derive(Tabled)]
struct RowLine {
    #[tabled(rename = "Category")]
    parent: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl RowLine {
    fn new(row: &BudgetRow, symbol: &str) -> Self {
        let mut notes = Vec::new();
        if row.is_expense_default {
            notes.push("recurring".to_string());
        }
        if let Some(pct) = row.share_percentage {
            notes.push(format!("{}% share", pct));
        }
        Self {
            parent: row.parent_category.clone().unwrap_or_default(),
            name: row.name.clone(),
            budgeted: format_money(row.budgeted, symbol),
            spent: format_money(row.spent, symbol),
            available: format_money(row.available, symbol),
            status: row.status.to_string(),
            notes: notes.join(", "),
        }
    }
}

/// Format a budget summary: totals, rows, then methodology if present
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    let mut output = format_header(&format!("Budget for {}", summary.period));
    output.push_str(&label_value("Income", &format_money(summary.income, symbol), 16));
    output.push_str(&label_value("Carryover", &format_money(summary.carryover, symbol), 16));
    output.push_str(&label_value("Budgeted", &format_money(summary.budgeted, symbol), 16));
    output.push_str(&label_value("Spent", &format_money(summary.spent, symbol), 16));
    output.push_str(&label_value("To be budgeted", &format_money(summary.tbb, symbol), 16));
    if summary.bills.tracked > 0 {
        output.push_str(&label_value(
            "Bills paid",
            &format!("{} of {}", summary.bills.paid, summary.bills.tracked),
            16,
        ));
    }
    output.push('\n');

    if summary.rows.is_empty() {
        output.push_str("No budget rows for this period.\n");
    } else {
        let lines: Vec<RowLine> = summary.rows.iter().map(|r| RowLine::new(r, symbol)).collect();
        let mut table = Table::new(lines);
        table.with(Style::rounded());
        output.push_str(&table.to_string());
        output.push('\n');
    }

    if let Some(sections) = &summary.methodology_sections {
        for section in sections {
            output.push('\n');
            output.push_str(&format_header(&section.title));
            for line in &section.lines {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    output
}

#[derive(Tabled)]
struct PeriodLine {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Type")]
    period_type: String,
    #[tabled(rename = "First day")]
    first: String,
    #[tabled(rename = "Last day")]
    last: String,
    #[tabled(rename = "Start (UTC)")]
    start: String,
}

/// Format periods with their local first and last days in `tz`
pub fn format_periods(periods: &[PeriodRange], tz: Tz) -> String {
    let lines: Vec<PeriodLine> = periods
        .iter()
        .map(|p| PeriodLine {
            label: p.label.clone(),
            period_type: p.period_type.to_string(),
            first: components_in_zone(p.start, &tz).to_string(),
            last: components_in_zone(p.end, &tz).to_string(),
            start: p.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        })
        .collect();
    let mut table = Table::new(lines);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_summary;
    use crate::models::{MethodologySection, PeriodType};
    use crate::services::PeriodService;
    use chrono::NaiveDate;

    #[test]
    fn test_format_summary() {
        let output = format_summary(&sample_summary(), "$");
        assert!(output.starts_with("Budget for March 2026\n"));
        assert!(output.contains("To be budgeted"));
        assert!(output.contains("$2000.00"));
        assert!(output.contains("Groceries, fresh"));
        assert!(output.contains("-$200.00"));
        assert!(output.contains("recurring, 50% share"));
        assert!(output.contains("Bills paid"));
        assert!(output.contains("1 of 1"));
    }

    #[test]
    fn test_format_summary_with_methodology() {
        let mut summary = sample_summary();
        let mut section = MethodologySection::new("Spent");
        section.line("2 expense transactions");
        summary.methodology_sections = Some(vec![section]);

        let output = format_summary(&summary, "£");
        assert!(output.contains("£1000.00"));
        assert!(output.contains("Spent\n─────\n2 expense transactions\n"));
    }

    #[test]
    fn test_empty_rows() {
        let mut summary = sample_summary();
        summary.rows.clear();
        assert!(format_summary(&summary, "$").contains("No budget rows"));
    }

    #[test]
    fn test_format_periods_uses_local_days() {
        let tz = chrono_tz::Australia::Sydney;
        let service = PeriodService::new(PeriodType::Monthly, tz);
        let march = service.period_for_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let output = format_periods(&service.periods_from(&march, 2), tz);

        assert!(output.contains("March 2026"));
        assert!(output.contains("April 2026"));
        assert!(output.contains("2026-03-31"));
        // Sydney midnight on Mar 1 is the previous afternoon in UTC
        assert!(output.contains("2026-02-28T13:00:00Z"));
    }
}
