//! Income source model
//!
//! Recurring sources are projected into each period by frequency conversion;
//! one-off sources only count once they have actually been received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frequency::Frequency;
use super::ids::UserId;
use super::money::Money;

/// Whether an income source repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    #[default]
    Recurring,
    OneOff,
}

/// Validation errors for income sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    NegativeAmount,
}

impl std::fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Income amount cannot be negative"),
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A source of household income
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSource {
    #[serde(default)]
    pub name: String,
    pub amount: Money,
    #[serde(default = "default_frequency")]
    pub frequency: Frequency,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub is_received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<DateTime<Utc>>,
    pub owner_id: UserId,
    /// Partner income typed in by the other partner rather than linked
    #[serde(default)]
    pub is_manual_partner: bool,
}

fn default_frequency() -> Frequency {
    Frequency::Monthly
}

impl IncomeSource {
    /// Create a recurring income source
    pub fn recurring(owner_id: impl Into<UserId>, amount: Money, frequency: Frequency) -> Self {
        Self {
            name: String::new(),
            amount,
            frequency,
            source_type: SourceType::Recurring,
            is_received: false,
            received_date: None,
            owner_id: owner_id.into(),
            is_manual_partner: false,
        }
    }

    /// Create a one-off income source that was received at `date`
    pub fn received_once(owner_id: impl Into<UserId>, amount: Money, date: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            amount,
            frequency: Frequency::Monthly,
            source_type: SourceType::OneOff,
            is_received: true,
            received_date: Some(date),
            owner_id: owner_id.into(),
            is_manual_partner: false,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.source_type == SourceType::Recurring
    }

    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.amount.is_negative() {
            return Err(IncomeValidationError::NegativeAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_recurring_constructor() {
        let source = IncomeSource::recurring("alex", Money::from_cents(500000), Frequency::Monthly);
        assert!(source.is_recurring());
        assert_eq!(source.owner_id.as_str(), "alex");
        assert!(source.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let source = IncomeSource::recurring("alex", Money::from_cents(-1), Frequency::Weekly);
        assert_eq!(source.validate(), Err(IncomeValidationError::NegativeAmount));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"amount": 120000, "owner_id": "sam", "source_type": "one-off",
                       "is_received": true, "received_date": "2026-01-10T00:00:00Z"}"#;
        let source: IncomeSource = serde_json::from_str(json).unwrap();
        assert!(!source.is_recurring());
        assert_eq!(
            source.received_date,
            Some(Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap())
        );
        assert!(!source.is_manual_partner);
    }
}
