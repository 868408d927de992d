//! Budget period representation
//!
//! A period is a half-open window of instants `[start, end]` (end is the last
//! millisecond before the next period starts) aligned to local midnights in
//! the household's timezone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::frequency::Frequency;

/// Budget period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Days 1-7, 8-14, 15-21, 22-end of each month
    Weekly,
    /// Days 1-14, 15-end of each month
    Fortnightly,
    /// The full calendar month
    #[default]
    Monthly,
}

impl PeriodType {
    /// The recurrence frequency amounts are converted to for this period type
    pub fn frequency(&self) -> Frequency {
        match self {
            Self::Weekly => Frequency::Weekly,
            Self::Fortnightly => Frequency::Fortnightly,
            Self::Monthly => Frequency::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "fortnightly" | "fortnight" | "biweekly" | "bi-weekly" => Ok(Self::Fortnightly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(PeriodParseError::UnknownType(other.to_string())),
        }
    }
}

/// A concrete budget window
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodRange {
    pub period_type: PeriodType,
    /// Local midnight of the first day, as an instant
    pub start: DateTime<Utc>,
    /// One millisecond before the next period's start
    pub end: DateTime<Utc>,
    pub label: String,
}

impl PeriodRange {
    /// Check if an instant falls inside this period (both ends inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Ord for PeriodRange {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialOrd for PeriodRange {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownType(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::UnknownType(s) => write!(f, "Unknown period type: {}", s),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_period_type() {
        assert_eq!("weekly".parse::<PeriodType>().unwrap(), PeriodType::Weekly);
        assert_eq!(
            "Bi-Weekly".parse::<PeriodType>().unwrap(),
            PeriodType::Fortnightly
        );
        assert_eq!(" month ".parse::<PeriodType>().unwrap(), PeriodType::Monthly);
        assert!("daily".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = PeriodRange {
            period_type: PeriodType::Monthly,
            start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap(),
            label: "January 2026".into(),
        };
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&PeriodType::Fortnightly).unwrap();
        assert_eq!(json, "\"fortnightly\"");
    }
}
