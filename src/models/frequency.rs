//! Recurrence frequencies
//!
//! Income sources carry a [`Frequency`]; expense definitions carry a
//! [`RecurrenceType`], which adds `one-time`. Both parse leniently: any
//! unrecognised string is treated as monthly instead of failing, because the
//! strings come from imported data that cannot be assumed clean.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring amount repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Fortnightly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Parse a frequency name, falling back to monthly
    pub fn parse_lenient(s: &str) -> Self {
        match normalize(s).as_str() {
            "weekly" | "week" => Self::Weekly,
            "fortnightly" | "fortnight" | "biweekly" => Self::Fortnightly,
            "monthly" | "month" => Self::Monthly,
            "quarterly" | "quarter" => Self::Quarterly,
            "yearly" | "year" | "annual" | "annually" => Self::Yearly,
            other => {
                tracing::debug!(frequency = other, "unrecognised frequency, using monthly");
                Self::Monthly
            }
        }
    }

    /// Amount per month for one unit at this frequency, as `(numerator, denominator)`
    pub fn monthly_factor(&self) -> (i64, i64) {
        match self {
            Self::Weekly => (4, 1),
            Self::Fortnightly => (2, 1),
            Self::Monthly => (1, 1),
            Self::Quarterly => (1, 3),
            Self::Yearly => (1, 12),
        }
    }

    /// Spacing of due dates in whole months, for calendar-month frequencies
    pub fn month_interval(&self) -> Option<i32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Yearly => Some(12),
            Self::Weekly | Self::Fortnightly => None,
        }
    }

    /// Spacing of due dates in days, for fixed-day frequencies
    pub fn day_interval(&self) -> Option<i64> {
        match self {
            Self::Weekly => Some(7),
            Self::Fortnightly => Some(14),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence of an expected expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceType {
    OneTime,
    Recurring(Frequency),
}

impl RecurrenceType {
    pub fn parse_lenient(s: &str) -> Self {
        match normalize(s).as_str() {
            "onetime" | "once" | "oneoff" => Self::OneTime,
            other => Self::Recurring(Frequency::parse_lenient(other)),
        }
    }

    /// The repeating frequency, or `None` for one-time expenses
    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            Self::OneTime => None,
            Self::Recurring(freq) => Some(*freq),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Recurring(freq) => freq.as_str(),
        }
    }
}

impl From<Frequency> for RecurrenceType {
    fn from(freq: Frequency) -> Self {
        Self::Recurring(freq)
    }
}

impl From<String> for RecurrenceType {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<RecurrenceType> for String {
    fn from(r: RecurrenceType) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_frequencies() {
        assert_eq!(Frequency::parse_lenient("Weekly"), Frequency::Weekly);
        assert_eq!(Frequency::parse_lenient("bi-weekly"), Frequency::Fortnightly);
        assert_eq!(Frequency::parse_lenient("annually"), Frequency::Yearly);
        assert_eq!(Frequency::parse_lenient("QUARTERLY"), Frequency::Quarterly);
    }

    #[test]
    fn test_unknown_frequency_defaults_to_monthly() {
        assert_eq!(Frequency::parse_lenient("every blue moon"), Frequency::Monthly);
        assert_eq!(Frequency::parse_lenient(""), Frequency::Monthly);
        assert_eq!(
            RecurrenceType::parse_lenient("sometimes"),
            RecurrenceType::Recurring(Frequency::Monthly)
        );
    }

    #[test]
    fn test_one_time_spellings() {
        assert_eq!(RecurrenceType::parse_lenient("one-time"), RecurrenceType::OneTime);
        assert_eq!(RecurrenceType::parse_lenient("one_off"), RecurrenceType::OneTime);
        assert_eq!(RecurrenceType::OneTime.frequency(), None);
    }

    #[test]
    fn test_serde_is_lenient() {
        let freq: Frequency = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(freq, Frequency::Fortnightly);

        let rec: RecurrenceType = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(rec, RecurrenceType::Recurring(Frequency::Monthly));

        let json = serde_json::to_string(&RecurrenceType::OneTime).unwrap();
        assert_eq!(json, "\"one-time\"");
    }

    #[test]
    fn test_intervals() {
        assert_eq!(Frequency::Quarterly.month_interval(), Some(3));
        assert_eq!(Frequency::Weekly.month_interval(), None);
        assert_eq!(Frequency::Fortnightly.day_interval(), Some(14));
    }
}
