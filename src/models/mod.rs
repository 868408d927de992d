//! Core data models for Hearth
//!
//! Typed snapshots of everything the engine reads (income, assignments,
//! expenses, splits, transactions, goals) and everything it returns (periods,
//! rows, summaries). All monetary values are integer cents.

pub mod budget;
pub mod category;
pub mod expense;
pub mod frequency;
pub mod goal;
pub mod ids;
pub mod income;
pub mod money;
pub mod period;
pub mod row;
pub mod snapshot;
pub mod split;
pub mod transaction;

pub use budget::{Assignment, AssignmentKind};
pub use category::{CategoryDisplay, CategoryLookup, CategoryMapping, SubcategoryKey};
pub use expense::{parse_anchor_date, ExpenseDefinition};
pub use frequency::{Frequency, RecurrenceType};
pub use goal::{AssetClass, AssetSummary, GoalSummary};
pub use ids::{AssetId, ExpenseId, GoalId, TransactionId, UserId};
pub use income::{IncomeSource, SourceType};
pub use money::Money;
pub use period::{PeriodRange, PeriodType};
pub use row::{BillsPaid, BudgetRow, BudgetSummary, CategoryStatus, MethodologySection, RowKind};
pub use snapshot::{BudgetSnapshot, PreviousPeriodSnapshot, ReportMode};
pub use split::{SplitScope, SplitSetting, SplitShares, SplitType};
pub use transaction::Transaction;
