//! Transaction model
//!
//! Amounts are signed: negative is money leaving the household. Category is an
//! external id resolved through [`CategoryMapping`](super::CategoryMapping).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ExpenseId, TransactionId, UserId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Money,
    #[serde(default)]
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_income: bool,
    /// Owner's share of this transaction, overriding any split setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_override_percentage: Option<u8>,
    /// Expense definition this transaction paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_expense_id: Option<ExpenseId>,
    /// Who paid; the requesting user when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        amount: Money,
        category_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            category_id: category_id.into(),
            created_at,
            is_income: false,
            split_override_percentage: None,
            matched_expense_id: None,
            owner_id: None,
        }
    }

    pub fn with_override(mut self, owner_percentage: u8) -> Self {
        self.split_override_percentage = Some(owner_percentage);
        self
    }

    pub fn matching(mut self, expense_id: impl Into<ExpenseId>) -> Self {
        self.matched_expense_id = Some(expense_id.into());
        self
    }

    /// An outflow that counts as spending
    pub fn is_expense(&self) -> bool {
        self.amount.is_negative() && !self.is_income
    }

    /// The spent amount as a positive value
    pub fn outflow(&self) -> Money {
        if self.is_expense() {
            self.amount.abs()
        } else {
            Money::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_expense_detection() {
        let spend = Transaction::new("t1", Money::from_cents(-4500), "ext-1", at(3));
        assert!(spend.is_expense());
        assert_eq!(spend.outflow(), Money::from_cents(4500));

        let refund = Transaction::new("t2", Money::from_cents(4500), "ext-1", at(4));
        assert!(!refund.is_expense());
        assert_eq!(refund.outflow(), Money::zero());

        let mut income_reversal = Transaction::new("t3", Money::from_cents(-100), "ext-1", at(5));
        income_reversal.is_income = true;
        assert!(!income_reversal.is_expense());
    }

    #[test]
    fn test_builders() {
        let t = Transaction::new("t1", Money::from_cents(-100), "ext-1", at(1))
            .with_override(30)
            .matching("rent");
        assert_eq!(t.split_override_percentage, Some(30));
        assert_eq!(t.matched_expense_id.unwrap().as_str(), "rent");
    }
}
