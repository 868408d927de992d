//! Reports module for Hearth
//!
//! Financial health metrics, the composite budget score, recommendations and
//! the combined report the `health` command prints.

pub mod budget_score;
pub mod health;
pub mod overview;
pub mod recommendations;

pub use budget_score::{BudgetScore, BudgetScoreInputs, ScoreComponent};
pub use health::{
    HealthInputs, HealthMetric, HealthMetrics, HealthScorer, MetricStatus, NetWorthPoint, Trend,
};
pub use overview::{HealthReport, HealthReportInput};
pub use recommendations::{
    analyze_goal_interactions, recommend, GoalInteraction, Priority, Recommendation,
    RecommendationSignals,
};
