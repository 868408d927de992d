//! Hearth - household budgeting engine
//!
//! Computes a household's budget for one period from a snapshot of its
//! income, assignments, recurring expenses, transactions and split rules.
//! Periods are calendar windows in the household's own timezone; amounts
//! are integer cents throughout.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (snapshots, periods, rows, summaries)
//! - `services`: The engine: calendar, recurrence, splits, aggregation, rows, carryover
//! - `reports`: Health metrics, budget score and recommendations
//! - `export`: JSON, YAML and CSV output
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `hearth` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth::models::{BudgetSnapshot, PeriodType};
//! use hearth::services::{PeriodService, SummaryRequest, SummaryService};
//!
//! let periods = PeriodService::new(PeriodType::Monthly, chrono_tz::Australia::Sydney);
//! let period = periods.period_for(chrono::Utc::now());
//! let summary = SummaryService::new(periods).compute(&snapshot, &SummaryRequest::new(period));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{HearthError, HearthResult};
