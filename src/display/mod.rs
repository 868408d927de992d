//! Display formatting for terminal output
//!
//! Renders summaries, periods and health reports as text tables.

pub mod health;
pub mod report;
pub mod summary;

pub use health::{format_budget_score, format_health_report};
pub use report::{format_bar, format_header, format_money};
pub use summary::{format_periods, format_summary};
