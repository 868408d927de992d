//! Recurring expense definitions
//!
//! An expense definition is the household's statement that a bill recurs. It
//! seeds a budget default for its subcategory whenever nothing was assigned
//! manually.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::SubcategoryKey;
use super::frequency::RecurrenceType;
use super::ids::{ExpenseId, UserId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDefinition {
    pub id: ExpenseId,
    pub category_name: String,
    pub expected_amount: Money,
    pub recurrence_type: RecurrenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_subcategory: Option<String>,
    /// Raw anchor string as stored; unparseable values project to nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<String>,
    /// Who pays this bill; the requesting user when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Counts towards essential spending in health metrics
    #[serde(default)]
    pub is_essential: bool,
}

impl ExpenseDefinition {
    pub fn new(
        id: impl Into<ExpenseId>,
        category_name: impl Into<String>,
        expected_amount: Money,
        recurrence_type: RecurrenceType,
    ) -> Self {
        Self {
            id: id.into(),
            category_name: category_name.into(),
            expected_amount,
            recurrence_type,
            inferred_subcategory: None,
            next_due_date: None,
            owner_id: None,
            is_essential: false,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.inferred_subcategory = Some(subcategory.into());
        self
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.next_due_date = Some(due.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<UserId>) -> Self {
        self.owner_id = Some(owner.into());
        self
    }

    pub fn essential(mut self) -> Self {
        self.is_essential = true;
        self
    }

    /// The subcategory this expense seeds a default for
    pub fn subcategory_key(&self) -> SubcategoryKey {
        SubcategoryKey::new(
            &self.category_name,
            self.inferred_subcategory
                .as_deref()
                .unwrap_or(&self.category_name),
        )
    }

    /// Parse the due date anchor
    ///
    /// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the date part is
    /// taken as written).
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.next_due_date.as_deref().and_then(parse_anchor_date)
    }
}

/// Parse a recurrence anchor leniently, returning `None` rather than failing
pub fn parse_anchor_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;

    #[test]
    fn test_subcategory_key() {
        let expense = ExpenseDefinition::new(
            "e1",
            "Utilities",
            Money::from_cents(9000),
            Frequency::Monthly.into(),
        );
        assert_eq!(
            expense.subcategory_key(),
            SubcategoryKey::new("Utilities", "Utilities")
        );
        let expense = expense.with_subcategory("Electricity");
        assert_eq!(
            expense.subcategory_key(),
            SubcategoryKey::new("Utilities", "Electricity")
        );
    }

    #[test]
    fn test_parse_anchor_date() {
        let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31);
        assert_eq!(parse_anchor_date("2026-01-31"), jan31);
        assert_eq!(parse_anchor_date("2026-01-31T09:30:00+11:00"), jan31);
        assert_eq!(parse_anchor_date("2026-01-31 09:30"), jan31);
        assert_eq!(parse_anchor_date("next tuesday"), None);
        assert_eq!(parse_anchor_date(""), None);
    }

    #[test]
    fn test_due_date_from_definition() {
        let expense = ExpenseDefinition::new(
            "e1",
            "Rent",
            Money::from_cents(200000),
            Frequency::Monthly.into(),
        )
        .with_due_date("garbage");
        assert_eq!(expense.due_date(), None);
    }
}
