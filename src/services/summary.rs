//! Budget summary service
//!
//! Composes the aggregators, the row waterfall and the carryover policy into
//! one [`BudgetSummary`] for a period. The computation reads only its
//! arguments, so the same snapshot and request always produce the same
//! summary.

use super::aggregate::{
    bills_paid, budgeted_total, AggregationScope, BudgetedAggregator, BudgetedTotal, IncomeAggregator,
    IncomeTotal, SpentAggregator, SpentBreakdown,
};
use super::carryover::{to_be_budgeted, CarryoverMode};
use super::period::PeriodService;
use super::split::SplitResolver;
use super::waterfall::{build_rows, WaterfallContext};
use crate::config::Settings;
use crate::models::{
    BudgetSnapshot, BudgetSummary, CategoryLookup, MethodologySection, Money, PeriodRange,
    PreviousPeriodSnapshot, ReportMode, UserId,
};

/// What to compute a summary for
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub period: PeriodRange,
    pub report_mode: ReportMode,
    pub user_id: Option<UserId>,
    pub carryover_mode: CarryoverMode,
    pub previous: Option<PreviousPeriodSnapshot>,
    pub include_methodology: bool,
}

impl SummaryRequest {
    /// A shared-mode request with no carryover
    pub fn new(period: PeriodRange) -> Self {
        Self {
            period,
            report_mode: ReportMode::Shared,
            user_id: None,
            carryover_mode: CarryoverMode::None,
            previous: None,
            include_methodology: false,
        }
    }

    /// A request using the household's configured preferences
    pub fn from_settings(period: PeriodRange, settings: &Settings) -> Self {
        Self {
            period,
            report_mode: settings.report_mode,
            user_id: settings.user_id.clone(),
            carryover_mode: settings.carryover_mode,
            previous: None,
            include_methodology: settings.include_methodology,
        }
    }

    pub fn individual(mut self, user_id: impl Into<UserId>) -> Self {
        self.report_mode = ReportMode::Individual;
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_previous(mut self, previous: PreviousPeriodSnapshot) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn with_methodology(mut self) -> Self {
        self.include_methodology = true;
        self
    }
}

/// Service for computing period summaries
#[derive(Debug, Clone, Copy)]
pub struct SummaryService {
    periods: PeriodService,
}

impl SummaryService {
    pub fn new(periods: PeriodService) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &PeriodService {
        &self.periods
    }

    /// Compute the summary for `request.period` from `snapshot`
    pub fn compute(&self, snapshot: &BudgetSnapshot, request: &SummaryRequest) -> BudgetSummary {
        let scope = AggregationScope::new(
            &self.periods,
            request.period.clone(),
            request.report_mode,
            request.user_id.clone(),
        );
        let resolver = SplitResolver::new(&snapshot.split_settings);

        let income = IncomeAggregator::new(&scope).total(&snapshot.income_sources);
        let defaults = BudgetedAggregator::new(&scope, resolver).expense_defaults(&snapshot.expenses);
        let budgeted = budgeted_total(&snapshot.assignments, &defaults);
        let spent = SpentAggregator::new(
            &scope,
            resolver,
            CategoryLookup::new(&snapshot.category_mappings),
            &snapshot.expenses,
        )
        .breakdown(&snapshot.transactions);
        let bills = bills_paid(&scope, &snapshot.expenses, &snapshot.transactions);

        let ctx = WaterfallContext::new(snapshot, &defaults, &spent.by_subcategory);
        let rows = build_rows(&ctx);

        let carryover = request.carryover_mode.carryover(request.previous.as_ref());
        let tbb = to_be_budgeted(income.total, carryover, budgeted.total);

        tracing::debug!(
            period = %request.period,
            income = %income.total,
            budgeted = %budgeted.total,
            spent = %spent.total,
            rows = rows.len(),
            bills_paid = bills.paid,
            bills_tracked = bills.tracked,
            "computed budget summary"
        );

        let methodology_sections = request.include_methodology.then(|| {
            methodology(
                request,
                &income,
                &budgeted,
                &spent,
                carryover,
            )
        });

        BudgetSummary {
            period: request.period.clone(),
            income: income.total,
            budgeted: budgeted.total,
            spent: spent.total,
            carryover,
            tbb,
            rows,
            essential_spent: spent.essential,
            bills,
            methodology_sections,
        }
    }
}

fn methodology(
    request: &SummaryRequest,
    income: &IncomeTotal,
    budgeted: &BudgetedTotal,
    spent: &SpentBreakdown,
    carryover: Money,
) -> Vec<MethodologySection> {
    let mode = match (&request.report_mode, &request.user_id) {
        (ReportMode::Individual, Some(user)) => format!("individual view for {}", user),
        (ReportMode::Individual, None) => "individual view".to_string(),
        (ReportMode::Shared, _) => "shared household view".to_string(),
    };

    let mut income_section = MethodologySection::new("Income");
    income_section.line(format!(
        "{} recurring sources converted to {} amounts",
        income.recurring_sources, request.period.period_type
    ));
    income_section.line(format!(
        "{} one-off sources received during {}",
        income.one_off_sources, request.period.label
    ));
    if income.excluded_sources > 0 {
        income_section.line(format!(
            "{} sources excluded ({})",
            income.excluded_sources, mode
        ));
    }

    let mut budgeted_section = MethodologySection::new("Budgeted");
    budgeted_section.line(format!("{} from manual assignments", budgeted.manual));
    budgeted_section.line(format!(
        "{} from recurring expenses in {} unassigned subcategories",
        budgeted.from_defaults,
        budgeted.substituted.len()
    ));
    for key in &budgeted.substituted {
        budgeted_section.line(format!("  default used for {}", key));
    }

    let mut spent_section = MethodologySection::new("Spent");
    spent_section.line(format!(
        "{} expense transactions across {} subcategories ({})",
        spent.counted,
        spent.by_subcategory.len(),
        mode
    ));
    if spent.dropped_unmapped > 0 {
        spent_section.line(format!(
            "{} transactions without a category mapping were left out",
            spent.dropped_unmapped
        ));
    }

    let mut carryover_section = MethodologySection::new("Carryover");
    carryover_section.line(format!(
        "{} carried in using the {} policy",
        carryover, request.carryover_mode
    ));

    vec![income_section, budgeted_section, spent_section, carryover_section]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Assignment, CategoryMapping, ExpenseDefinition, Frequency, IncomeSource, PeriodType,
        SplitScope, SplitSetting, SplitType, Transaction,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn service() -> SummaryService {
        SummaryService::new(PeriodService::new(PeriodType::Monthly, chrono_tz::Australia::Sydney))
    }

    fn march() -> PeriodRange {
        service()
            .periods()
            .period_for_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    fn snapshot() -> BudgetSnapshot {
        BudgetSnapshot {
            income_sources: vec![
                IncomeSource::recurring("alex", cents(400_000), Frequency::Monthly),
                IncomeSource::recurring("sam", cents(150_000), Frequency::Fortnightly),
            ],
            assignments: vec![
                Assignment::category("Food", "Groceries", cents(80_000)),
                Assignment::category("Housing", "Rent", Money::zero()),
            ],
            expenses: vec![ExpenseDefinition::new(
                "rent",
                "Housing",
                cents(250_000),
                Frequency::Monthly.into(),
            )
            .with_subcategory("Rent")
            .with_due_date("2026-01-03")],
            transactions: vec![
                // 09:00 on Mar 1 in Sydney is still Feb 28 in UTC
                Transaction::new(
                    "t1",
                    cents(-6_000),
                    "groceries",
                    Utc.with_ymd_and_hms(2026, 2, 28, 22, 0, 0).unwrap(),
                ),
                Transaction::new(
                    "t2",
                    cents(-250_000),
                    "rent",
                    Utc.with_ymd_and_hms(2026, 3, 3, 1, 0, 0).unwrap(),
                )
                .matching("rent"),
                Transaction::new(
                    "t3",
                    cents(-1_000),
                    "mystery",
                    Utc.with_ymd_and_hms(2026, 3, 4, 1, 0, 0).unwrap(),
                ),
            ],
            split_settings: vec![SplitSetting::new(SplitScope::Default, SplitType::Equal)],
            category_mappings: vec![
                CategoryMapping::new("groceries", "Food", "Groceries"),
                CategoryMapping::new("rent", "Housing", "Rent"),
            ],
            ..BudgetSnapshot::default()
        }
    }

    #[test]
    fn test_shared_summary() {
        let summary = service().compute(&snapshot(), &SummaryRequest::new(march()));

        assert_eq!(summary.income, cents(700_000));
        assert_eq!(summary.budgeted, cents(330_000));
        assert_eq!(summary.spent, cents(256_000));
        assert_eq!(summary.carryover, Money::zero());
        assert_eq!(summary.tbb, cents(370_000));

        let rent = summary.row("sub:housing:rent").unwrap();
        assert!(rent.is_expense_default);
        assert_eq!(rent.available, Money::zero());
        assert!(summary.methodology_sections.is_none());
    }

    #[test]
    fn test_individual_summary_halves_shared_items() {
        let request = SummaryRequest::new(march()).individual("alex");
        let summary = service().compute(&snapshot(), &request);

        assert_eq!(summary.income, cents(400_000));
        // Manual groceries stay whole, the rent default is split
        assert_eq!(summary.budgeted, cents(80_000 + 125_000));
        assert_eq!(summary.spent, cents(3_000 + 125_000));
        assert_eq!(summary.row("sub:housing:rent").unwrap().share_percentage, Some(50));
    }

    #[test]
    fn test_carryover_feeds_tbb() {
        let previous = PreviousPeriodSnapshot {
            income: cents(500_000),
            budgeted: cents(500_000),
            spent: cents(450_000),
            carryover: Money::zero(),
        };
        let mut request = SummaryRequest::new(march()).with_previous(previous);
        assert_eq!(service().compute(&snapshot(), &request).carryover, Money::zero());

        request.carryover_mode = CarryoverMode::PositiveOnly;
        let summary = service().compute(&snapshot(), &request);
        assert_eq!(summary.carryover, cents(50_000));
        assert_eq!(summary.tbb, cents(420_000));
    }

    #[test]
    fn test_methodology_sections() {
        let request = SummaryRequest::new(march()).with_methodology();
        let summary = service().compute(&snapshot(), &request);
        let sections = summary.methodology_sections.unwrap();
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Income", "Budgeted", "Spent", "Carryover"]);
        assert!(sections[2]
            .lines
            .iter()
            .any(|l| l.contains("1 transactions without a category mapping")));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let snapshot = snapshot();
        let request = SummaryRequest::new(march()).individual("sam").with_methodology();
        let first = service().compute(&snapshot, &request);
        let second = service().compute(&snapshot, &request);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
