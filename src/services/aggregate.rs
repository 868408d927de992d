//! Period aggregators
//!
//! Roll typed source rows into per-period totals. Each aggregator reads one
//! kind of input (income sources, assignments plus expense definitions, or
//! transactions) and honors the report mode: in individual mode only the
//! requesting user's portion of shared items is counted.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use super::frequency::convert;
use super::period::PeriodService;
use super::recurrence::count_occurrences_str;
use super::split::{apply_percentage, SplitResolver};
use crate::models::{
    Assignment, AssignmentKind, CategoryLookup, ExpenseDefinition, ExpenseId, IncomeSource, Money,
    PeriodRange, ReportMode, Transaction, UserId,
};

pub use crate::models::{BillsPaid, SubcategoryKey};

/// The period and perspective every aggregate is computed for
#[derive(Debug, Clone)]
pub struct AggregationScope {
    pub period: PeriodRange,
    /// Inclusive local first and last day of the period
    pub window: (NaiveDate, NaiveDate),
    pub report_mode: ReportMode,
    pub user_id: Option<UserId>,
}

impl AggregationScope {
    pub fn new(
        service: &PeriodService,
        period: PeriodRange,
        report_mode: ReportMode,
        user_id: Option<UserId>,
    ) -> Self {
        let window = service.local_bounds(&period);
        Self {
            period,
            window,
            report_mode,
            user_id,
        }
    }

    fn individual(&self) -> bool {
        self.report_mode.is_individual()
    }
}

/// Income counted for a period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeTotal {
    pub total: Money,
    pub recurring_sources: usize,
    pub one_off_sources: usize,
    pub excluded_sources: usize,
}

/// Sums income sources into a period total
#[derive(Debug, Clone, Copy)]
pub struct IncomeAggregator<'a> {
    scope: &'a AggregationScope,
}

impl<'a> IncomeAggregator<'a> {
    pub fn new(scope: &'a AggregationScope) -> Self {
        Self { scope }
    }

    /// What one source contributes, or `None` when it does not count
    pub fn contribution(&self, source: &IncomeSource) -> Option<Money> {
        if self.scope.individual() {
            if source.is_manual_partner {
                return None;
            }
            if let Some(user) = &self.scope.user_id {
                if &source.owner_id != user {
                    return None;
                }
            }
        }

        if source.is_recurring() {
            Some(convert(
                source.amount,
                source.frequency,
                self.scope.period.period_type.frequency(),
            ))
        } else {
            let received_now = source.is_received
                && source
                    .received_date
                    .is_some_and(|date| self.scope.period.contains(date));
            received_now.then_some(source.amount)
        }
    }

    pub fn total(&self, sources: &[IncomeSource]) -> IncomeTotal {
        let mut result = IncomeTotal::default();
        for source in sources {
            match self.contribution(source) {
                Some(amount) => {
                    result.total += amount;
                    if source.is_recurring() {
                        result.recurring_sources += 1;
                    } else {
                        result.one_off_sources += 1;
                    }
                }
                None => result.excluded_sources += 1,
            }
        }
        result
    }
}

/// A budget amount inferred from one or more recurring expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDefault {
    pub amount: Money,
    /// Requesting user's share, when the amount was split
    pub share_percentage: Option<u8>,
    pub expense_ids: Vec<ExpenseId>,
}

/// Budgeted money for a period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetedTotal {
    pub total: Money,
    /// Positive manual assignments of every kind
    pub manual: Money,
    /// Expense defaults standing in for missing assignments
    pub from_defaults: Money,
    pub substituted: Vec<SubcategoryKey>,
}

/// Sums manual assignments and fills gaps with expense defaults
#[derive(Debug, Clone, Copy)]
pub struct BudgetedAggregator<'a> {
    scope: &'a AggregationScope,
    resolver: SplitResolver<'a>,
}

impl<'a> BudgetedAggregator<'a> {
    pub fn new(scope: &'a AggregationScope, resolver: SplitResolver<'a>) -> Self {
        Self { scope, resolver }
    }

    /// Period amount of a single expense and the share it was reduced to
    ///
    /// With a due date the expected amount is multiplied by the number of
    /// occurrences inside the period; without one, recurring expenses are
    /// converted by frequency and one-time expenses contribute nothing.
    pub fn expense_amount(&self, expense: &ExpenseDefinition) -> (Money, Option<u8>) {
        let (start, end) = self.scope.window;
        let full = match (&expense.next_due_date, expense.recurrence_type.frequency()) {
            (Some(anchor), _) => {
                let count = count_occurrences_str(anchor, expense.recurrence_type, start, end);
                expense.expected_amount.mul_ratio(i64::from(count), 1)
            }
            (None, Some(freq)) => convert(
                expense.expected_amount,
                freq,
                self.scope.period.period_type.frequency(),
            ),
            (None, None) => Money::zero(),
        };

        if !self.scope.individual() {
            return (full, None);
        }
        let shares = self
            .resolver
            .resolve_shares(None, Some(&expense.id), &expense.category_name);
        let pct = self.resolver.resolve_percentage(
            shares,
            self.scope.user_id.as_ref(),
            expense.owner_id.as_ref(),
        );
        (apply_percentage(full, pct), Some(pct))
    }

    /// Expense defaults per subcategory
    ///
    /// Several expenses seeding the same subcategory are summed; the share is
    /// only reported when all of them agree on it.
    pub fn expense_defaults(
        &self,
        expenses: &[ExpenseDefinition],
    ) -> BTreeMap<SubcategoryKey, ExpenseDefault> {
        let mut defaults: BTreeMap<SubcategoryKey, ExpenseDefault> = BTreeMap::new();
        for expense in expenses {
            let (amount, share) = self.expense_amount(expense);
            defaults
                .entry(expense.subcategory_key())
                .and_modify(|d| {
                    d.amount += amount;
                    if d.share_percentage != share {
                        d.share_percentage = None;
                    }
                    d.expense_ids.push(expense.id.clone());
                })
                .or_insert_with(|| ExpenseDefault {
                    amount,
                    share_percentage: share,
                    expense_ids: vec![expense.id.clone()],
                });
        }
        defaults
    }

    pub fn total(
        &self,
        assignments: &[Assignment],
        expenses: &[ExpenseDefinition],
    ) -> BudgetedTotal {
        budgeted_total(assignments, &self.expense_defaults(expenses))
    }
}

/// Positive assignments plus the defaults of subcategories lacking one
pub fn budgeted_total(
    assignments: &[Assignment],
    defaults: &BTreeMap<SubcategoryKey, ExpenseDefault>,
) -> BudgetedTotal {
    let manual: Money = assignments
        .iter()
        .filter(|a| a.assigned.is_positive())
        .map(|a| a.assigned)
        .sum();

    let assigned = manual_by_subcategory(assignments);
    let mut result = BudgetedTotal {
        manual,
        ..BudgetedTotal::default()
    };
    for (key, default) in defaults {
        let has_positive = assigned.get(key).is_some_and(|a| a.is_positive());
        if !has_positive {
            result.from_defaults += default.amount;
            result.substituted.push(key.clone());
        }
    }
    result.total = result.manual + result.from_defaults;
    result
}

/// Category assignments summed per subcategory
pub fn manual_by_subcategory(assignments: &[Assignment]) -> BTreeMap<SubcategoryKey, Money> {
    let mut by_key = BTreeMap::new();
    for assignment in assignments
        .iter()
        .filter(|a| a.kind == AssignmentKind::Category)
    {
        *by_key
            .entry(assignment.subcategory_key())
            .or_insert_with(Money::zero) += assignment.assigned;
    }
    by_key
}

/// Spending for a period, keyed by subcategory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpentBreakdown {
    pub total: Money,
    pub by_subcategory: BTreeMap<SubcategoryKey, Money>,
    /// Spending on essential bills or in subcategories they seed
    pub essential: Money,
    pub counted: usize,
    /// Expense transactions whose category had no mapping
    pub dropped_unmapped: usize,
}

/// Maps expense transactions to subcategories and sums them
#[derive(Debug, Clone)]
pub struct SpentAggregator<'a> {
    scope: &'a AggregationScope,
    resolver: SplitResolver<'a>,
    lookup: CategoryLookup,
    expenses: &'a [ExpenseDefinition],
}

impl<'a> SpentAggregator<'a> {
    pub fn new(
        scope: &'a AggregationScope,
        resolver: SplitResolver<'a>,
        lookup: CategoryLookup,
        expenses: &'a [ExpenseDefinition],
    ) -> Self {
        Self {
            scope,
            resolver,
            lookup,
            expenses,
        }
    }

    /// The requesting user's part of one transaction's outflow
    fn portion(&self, txn: &Transaction, key: &SubcategoryKey) -> Money {
        let outflow = txn.outflow();
        if !self.scope.individual() {
            return outflow;
        }
        let expense = txn
            .matched_expense_id
            .as_ref()
            .and_then(|id| self.expenses.iter().find(|e| &e.id == id));
        let owner = txn
            .owner_id
            .as_ref()
            .or_else(|| expense.and_then(|e| e.owner_id.as_ref()));
        let shares = self.resolver.resolve_shares(
            txn.split_override_percentage,
            txn.matched_expense_id.as_ref(),
            &key.parent,
        );
        let pct = self
            .resolver
            .resolve_percentage(shares, self.scope.user_id.as_ref(), owner);
        apply_percentage(outflow, pct)
    }

    fn is_essential(
        &self,
        txn: &Transaction,
        key: &SubcategoryKey,
        essential_keys: &BTreeSet<SubcategoryKey>,
    ) -> bool {
        essential_keys.contains(key)
            || txn.matched_expense_id.as_ref().is_some_and(|id| {
                self.expenses.iter().any(|e| &e.id == id && e.is_essential)
            })
    }

    pub fn breakdown(&self, transactions: &[Transaction]) -> SpentBreakdown {
        let essential_keys: BTreeSet<SubcategoryKey> = self
            .expenses
            .iter()
            .filter(|e| e.is_essential)
            .map(ExpenseDefinition::subcategory_key)
            .collect();
        let mut result = SpentBreakdown::default();
        for txn in transactions {
            if !txn.is_expense() || !self.scope.period.contains(txn.created_at) {
                continue;
            }
            let Some(key) = self.lookup.resolve(&txn.category_id) else {
                tracing::debug!(
                    transaction = %txn.id,
                    category = %txn.category_id,
                    "dropping transaction with unmapped category"
                );
                result.dropped_unmapped += 1;
                continue;
            };
            let amount = self.portion(txn, key);
            if self.is_essential(txn, key, &essential_keys) {
                result.essential += amount;
            }
            *result
                .by_subcategory
                .entry(key.clone())
                .or_insert_with(Money::zero) += amount;
            result.total += amount;
            result.counted += 1;
        }
        result
    }
}

/// Count expense definitions due in the period that have a matched payment
///
/// An expense is due when its anchor projects at least once into the period,
/// or when it recurs without a known anchor.
pub fn bills_paid(
    scope: &AggregationScope,
    expenses: &[ExpenseDefinition],
    transactions: &[Transaction],
) -> BillsPaid {
    let (start, end) = scope.window;
    let mut result = BillsPaid::default();
    for expense in expenses {
        let due = match &expense.next_due_date {
            Some(anchor) => count_occurrences_str(anchor, expense.recurrence_type, start, end) > 0,
            None => expense.recurrence_type.frequency().is_some(),
        };
        if !due {
            continue;
        }
        result.tracked += 1;
        let paid = transactions.iter().any(|t| {
            t.is_expense()
                && scope.period.contains(t.created_at)
                && t.matched_expense_id.as_ref() == Some(&expense.id)
        });
        if paid {
            result.paid += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryMapping, Frequency, PeriodType, RecurrenceType, SplitScope, SplitSetting,
        SplitType,
    };
    use chrono::{TimeZone, Utc};

    fn scope(mode: ReportMode) -> AggregationScope {
        let service = PeriodService::new(PeriodType::Monthly, chrono_tz::UTC);
        let period = service.period_for_date(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        AggregationScope::new(&service, period, mode, Some(UserId::new("alex")))
    }

    fn at(month: u32, day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, day, 12, 0, 0).unwrap()
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_income_recurring_and_one_off() {
        let scope = scope(ReportMode::Shared);
        let sources = vec![
            IncomeSource::recurring("alex", cents(100_000), Frequency::Fortnightly),
            IncomeSource::recurring("sam", cents(1_200_000), Frequency::Yearly),
            IncomeSource::received_once("alex", cents(5_000), at(2, 3)),
            // Received last month: not this period
            IncomeSource::received_once("alex", cents(7_000), at(1, 30)),
        ];
        let total = IncomeAggregator::new(&scope).total(&sources);
        assert_eq!(total.total, cents(200_000 + 100_000 + 5_000));
        assert_eq!(total.recurring_sources, 2);
        assert_eq!(total.one_off_sources, 1);
        assert_eq!(total.excluded_sources, 1);
    }

    #[test]
    fn test_income_one_off_not_received() {
        let scope = scope(ReportMode::Shared);
        let mut pending = IncomeSource::received_once("alex", cents(5_000), at(2, 3));
        pending.is_received = false;
        assert_eq!(IncomeAggregator::new(&scope).contribution(&pending), None);
    }

    #[test]
    fn test_income_individual_mode_filters() {
        let scope = scope(ReportMode::Individual);
        let mut manual = IncomeSource::recurring("alex", cents(50_000), Frequency::Monthly);
        manual.is_manual_partner = true;
        let sources = vec![
            IncomeSource::recurring("alex", cents(300_000), Frequency::Monthly),
            IncomeSource::recurring("sam", cents(400_000), Frequency::Monthly),
            manual,
        ];
        let total = IncomeAggregator::new(&scope).total(&sources);
        assert_eq!(total.total, cents(300_000));
        assert_eq!(total.excluded_sources, 2);
    }

    #[test]
    fn test_expense_amount_by_occurrence_and_frequency() {
        let scope = scope(ReportMode::Shared);
        let budgeted = BudgetedAggregator::new(&scope, SplitResolver::new(&[]));

        let weekly = ExpenseDefinition::new(
            "gym",
            "Health",
            cents(1_500),
            RecurrenceType::Recurring(Frequency::Weekly),
        )
        .with_due_date("2026-02-02");
        // Feb 2, 9, 16, 23
        assert_eq!(budgeted.expense_amount(&weekly).0, cents(6_000));

        let no_anchor = ExpenseDefinition::new(
            "insurance",
            "Bills",
            cents(120_000),
            RecurrenceType::Recurring(Frequency::Yearly),
        );
        assert_eq!(budgeted.expense_amount(&no_anchor).0, cents(10_000));

        let one_time =
            ExpenseDefinition::new("party", "Fun", cents(9_999), RecurrenceType::OneTime);
        assert_eq!(budgeted.expense_amount(&one_time).0, Money::zero());

        let garbage = ExpenseDefinition::new(
            "bad",
            "Bills",
            cents(1_000),
            RecurrenceType::Recurring(Frequency::Monthly),
        )
        .with_due_date("whenever");
        assert_eq!(budgeted.expense_amount(&garbage).0, Money::zero());
    }

    #[test]
    fn test_expense_amount_split_in_individual_mode() {
        let scope = scope(ReportMode::Individual);
        let settings = vec![SplitSetting::custom(
            SplitScope::Category {
                category_name: "Housing".into(),
            },
            70,
        )];
        let budgeted = BudgetedAggregator::new(&scope, SplitResolver::new(&settings));
        let rent = ExpenseDefinition::new(
            "rent",
            "Housing",
            cents(200_000),
            RecurrenceType::Recurring(Frequency::Monthly),
        )
        .with_subcategory("Rent");

        assert_eq!(budgeted.expense_amount(&rent), (cents(140_000), Some(70)));
        let partner_owned = rent.clone().with_owner("sam");
        assert_eq!(budgeted.expense_amount(&partner_owned), (cents(60_000), Some(30)));
    }

    #[test]
    fn test_budgeted_total_substitutes_defaults() {
        let scope = scope(ReportMode::Shared);
        let budgeted = BudgetedAggregator::new(&scope, SplitResolver::new(&[]));
        let assignments = vec![
            Assignment::category("Housing", "Rent", cents(180_000)),
            Assignment::category("Utilities", "Power", Money::zero()),
            Assignment::goal("holiday", cents(20_000)),
        ];
        let expenses = vec![
            // Overridden by the positive assignment
            ExpenseDefinition::new("rent", "Housing", cents(200_000), Frequency::Monthly.into())
                .with_subcategory("Rent"),
            ExpenseDefinition::new("power", "Utilities", cents(9_000), Frequency::Monthly.into())
                .with_subcategory("Power"),
            ExpenseDefinition::new("phone", "Utilities", cents(4_000), Frequency::Monthly.into())
                .with_subcategory("Phone"),
        ];
        let total = budgeted.total(&assignments, &expenses);
        assert_eq!(total.manual, cents(200_000));
        assert_eq!(total.from_defaults, cents(13_000));
        assert_eq!(total.total, cents(213_000));
        assert_eq!(total.substituted.len(), 2);
    }

    #[test]
    fn test_expense_defaults_merge_per_subcategory() {
        let scope = scope(ReportMode::Shared);
        let budgeted = BudgetedAggregator::new(&scope, SplitResolver::new(&[]));
        let expenses = vec![
            ExpenseDefinition::new("netflix", "Subscriptions", cents(1_500), Frequency::Monthly.into()),
            ExpenseDefinition::new("spotify", "subscriptions", cents(1_200), Frequency::Monthly.into()),
        ];
        let defaults = budgeted.expense_defaults(&expenses);
        assert_eq!(defaults.len(), 1);
        let merged = defaults.values().next().unwrap();
        assert_eq!(merged.amount, cents(2_700));
        assert_eq!(merged.expense_ids.len(), 2);
    }

    fn mappings() -> CategoryLookup {
        CategoryLookup::new(&[
            CategoryMapping::new("ext-groc", "Food", "Groceries"),
            CategoryMapping::new("ext-groc-2", "Food", "Groceries"),
            CategoryMapping::new("ext-fuel", "Transport", "Fuel"),
        ])
    }

    #[test]
    fn test_spent_maps_and_drops() {
        let scope = scope(ReportMode::Shared);
        let txns = vec![
            Transaction::new("t1", cents(-5_000), "ext-groc", at(2, 2)),
            Transaction::new("t2", cents(-2_500), "ext-groc-2", at(2, 20)),
            Transaction::new("t3", cents(-4_000), "ext-fuel", at(2, 5)),
            Transaction::new("t4", cents(-1_000), "ext-unknown", at(2, 5)),
            Transaction::new("t5", cents(3_000), "ext-groc", at(2, 6)),
            Transaction::new("t6", cents(-9_000), "ext-groc", at(3, 1)),
        ];
        let spent = SpentAggregator::new(&scope, SplitResolver::new(&[]), mappings(), &[])
            .breakdown(&txns);
        assert_eq!(spent.total, cents(11_500));
        assert_eq!(spent.counted, 3);
        assert_eq!(spent.dropped_unmapped, 1);
        assert_eq!(
            spent.by_subcategory[&SubcategoryKey::new("Food", "Groceries")],
            cents(7_500)
        );
    }

    #[test]
    fn test_spent_split_priority_in_individual_mode() {
        let scope = scope(ReportMode::Individual);
        let settings = vec![
            SplitSetting::new(SplitScope::Default, SplitType::Equal),
            SplitSetting::custom(
                SplitScope::Category {
                    category_name: "Transport".into(),
                },
                80,
            ),
        ];
        let txns = vec![
            Transaction::new("t1", cents(-10_000), "ext-groc", at(2, 2)),
            Transaction::new("t2", cents(-10_000), "ext-fuel", at(2, 3)),
            Transaction::new("t3", cents(-10_000), "ext-fuel", at(2, 4)).with_override(10),
        ];
        let spent = SpentAggregator::new(&scope, SplitResolver::new(&settings), mappings(), &[])
            .breakdown(&txns);
        assert_eq!(
            spent.by_subcategory[&SubcategoryKey::new("Food", "Groceries")],
            cents(5_000)
        );
        assert_eq!(
            spent.by_subcategory[&SubcategoryKey::new("Transport", "Fuel")],
            cents(8_000 + 1_000)
        );
    }

    #[test]
    fn test_spent_essential_portion() {
        let scope = scope(ReportMode::Shared);
        let expenses = vec![
            ExpenseDefinition::new("food", "Food", cents(60_000), Frequency::Monthly.into())
                .with_subcategory("Groceries")
                .essential(),
            ExpenseDefinition::new("car", "Transport", cents(20_000), Frequency::Monthly.into())
                .with_subcategory("Loan")
                .essential(),
        ];
        let txns = vec![
            Transaction::new("t1", cents(-5_000), "ext-groc", at(2, 2)),
            Transaction::new("t2", cents(-4_000), "ext-fuel", at(2, 5)),
            // Filed under fuel but paying the essential car loan
            Transaction::new("t3", cents(-20_000), "ext-fuel", at(2, 6)).matching("car"),
        ];
        let spent = SpentAggregator::new(&scope, SplitResolver::new(&[]), mappings(), &expenses)
            .breakdown(&txns);
        assert_eq!(spent.total, cents(29_000));
        assert_eq!(spent.essential, cents(25_000));
    }

    #[test]
    fn test_bills_paid() {
        let scope = scope(ReportMode::Shared);
        let expenses = vec![
            ExpenseDefinition::new("rent", "Housing", cents(1), Frequency::Monthly.into())
                .with_due_date("2026-01-01"),
            ExpenseDefinition::new("power", "Utilities", cents(1), Frequency::Monthly.into()),
            // Not due in February
            ExpenseDefinition::new("rates", "Housing", cents(1), Frequency::Quarterly.into())
                .with_due_date("2026-01-15"),
        ];
        let txns = vec![
            Transaction::new("t1", cents(-1), "ext", at(2, 1)).matching("rent"),
            Transaction::new("t2", cents(-1), "ext", at(1, 15)).matching("power"),
        ];
        let bills = bills_paid(&scope, &expenses, &txns);
        assert_eq!(bills, BillsPaid { paid: 1, tracked: 2 });
        assert!(!bills.all_paid());
    }
}
