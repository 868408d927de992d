//! Service layer for Hearth
//!
//! The budgeting engine: calendar and period arithmetic, recurrence
//! projection, split resolution, aggregation, the row waterfall and carryover.
//! Every service is a pure computation over the snapshot it is handed.

pub mod aggregate;
pub mod calendar;
pub mod carryover;
pub mod frequency;
pub mod period;
pub mod recurrence;
pub mod split;
pub mod summary;
pub mod waterfall;

pub use aggregate::{
    bills_paid, AggregationScope, BillsPaid, BudgetedAggregator, ExpenseDefault,
    IncomeAggregator, SpentAggregator,
};
pub use carryover::{to_be_budgeted, CarryoverMode, CarryoverStrategy};
pub use period::PeriodService;
pub use recurrence::{count_occurrences, count_occurrences_str, occurrences, upcoming};
pub use split::{apply_percentage, SplitResolver};
pub use summary::{SummaryRequest, SummaryService};
pub use waterfall::{build_rows, RowAccumulator, WaterfallContext, LAYERS};
