//! Split resolution
//!
//! Decides which share of a shared expense belongs to the requesting user.
//! Settings are tiered; the most specific one wins:
//!
//! 1. a per-transaction override
//! 2. a setting scoped to the expense definition
//! 3. a setting scoped to the parent category
//! 4. the household's default setting
//!
//! With nothing matching, the expense is fully personal (100%).

use crate::models::{ExpenseId, Money, SplitScope, SplitSetting, SplitShares, UserId};

/// Resolves split percentages against one household's settings
#[derive(Debug, Clone, Copy)]
pub struct SplitResolver<'a> {
    settings: &'a [SplitSetting],
}

impl<'a> SplitResolver<'a> {
    pub fn new(settings: &'a [SplitSetting]) -> Self {
        Self { settings }
    }

    /// The most specific setting for an expense and/or category
    pub fn find_setting(
        &self,
        expense_id: Option<&ExpenseId>,
        category_name: &str,
    ) -> Option<&'a SplitSetting> {
        let by_expense = expense_id.and_then(|id| {
            self.settings.iter().find(|s| {
                matches!(&s.scope, SplitScope::Expense { expense_id } if expense_id == id)
            })
        });
        if by_expense.is_some() {
            return by_expense;
        }

        let wanted = category_name.trim();
        let by_category = self.settings.iter().find(|s| {
            matches!(&s.scope, SplitScope::Category { category_name }
                if category_name.trim().eq_ignore_ascii_case(wanted))
        });
        if by_category.is_some() {
            return by_category;
        }

        self.settings.iter().find(|s| s.scope == SplitScope::Default)
    }

    /// Owner/partner shares, honoring a transaction-level override first
    pub fn resolve_shares(
        &self,
        override_percentage: Option<u8>,
        expense_id: Option<&ExpenseId>,
        category_name: &str,
    ) -> SplitShares {
        if let Some(owner) = override_percentage {
            return SplitShares::from_owner(owner);
        }
        self.find_setting(expense_id, category_name)
            .map(SplitSetting::shares)
            .unwrap_or_else(SplitShares::personal)
    }

    /// The requesting user's percentage of `shares`
    ///
    /// The user gets the owner side when they own the item, or when no owner
    /// is recorded; otherwise the partner side.
    pub fn resolve_percentage(
        &self,
        shares: SplitShares,
        user_id: Option<&UserId>,
        owner_id: Option<&UserId>,
    ) -> u8 {
        match (user_id, owner_id) {
            (Some(user), Some(owner)) if user != owner => shares.partner(),
            _ => shares.owner(),
        }
    }
}

/// The requesting user's portion of `amount`
pub fn apply_percentage(amount: Money, percentage: u8) -> Money {
    amount.percent(percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitType;

    fn settings() -> Vec<SplitSetting> {
        vec![
            SplitSetting::new(SplitScope::Default, SplitType::Equal),
            SplitSetting::custom(
                SplitScope::Category {
                    category_name: "Groceries".into(),
                },
                70,
            ),
            SplitSetting::new(
                SplitScope::Expense {
                    expense_id: "rent".into(),
                },
                SplitType::IndividualPartner,
            ),
        ]
    }

    #[test]
    fn test_custom_category_split() {
        let settings = settings();
        let resolver = SplitResolver::new(&settings);
        let shares = resolver.resolve_shares(None, None, "Groceries");
        let owner = UserId::new("alex");
        let partner = UserId::new("sam");

        let amount = Money::from_cents(10000);
        let owner_pct = resolver.resolve_percentage(shares, Some(&owner), Some(&owner));
        let partner_pct = resolver.resolve_percentage(shares, Some(&partner), Some(&owner));
        assert_eq!(apply_percentage(amount, owner_pct), Money::from_cents(7000));
        assert_eq!(apply_percentage(amount, partner_pct), Money::from_cents(3000));
    }

    #[test]
    fn test_priority_order() {
        let settings = settings();
        let resolver = SplitResolver::new(&settings);
        let rent = ExpenseId::new("rent");

        // Transaction override beats everything
        assert_eq!(resolver.resolve_shares(Some(20), Some(&rent), "Groceries").owner(), 20);
        // Expense beats category
        assert_eq!(resolver.resolve_shares(None, Some(&rent), "Groceries").owner(), 0);
        // Category match ignores case and padding
        assert_eq!(resolver.resolve_shares(None, None, "  groceries ").owner(), 70);
        // Default applies to anything else
        assert_eq!(resolver.resolve_shares(None, None, "Transport").owner(), 50);
    }

    #[test]
    fn test_no_settings_is_personal() {
        let resolver = SplitResolver::new(&[]);
        let shares = resolver.resolve_shares(None, None, "Anything");
        assert_eq!(shares, SplitShares::personal());
        assert_eq!(resolver.resolve_percentage(shares, None, None), 100);
        assert!(resolver.find_setting(None, "Anything").is_none());
    }

    #[test]
    fn test_owner_and_partner_always_sum_to_100() {
        let mut all = settings();
        for pct in [0u8, 1, 33, 50, 99, 100] {
            all.push(SplitSetting::custom(SplitScope::Default, pct));
        }
        let owner = UserId::new("alex");
        let partner = UserId::new("sam");
        for setting in &all {
            let single = std::slice::from_ref(setting);
            let resolver = SplitResolver::new(single);
            let shares = resolver.resolve_shares(None, None, "Groceries");
            let a = resolver.resolve_percentage(shares, Some(&owner), Some(&owner));
            let b = resolver.resolve_percentage(shares, Some(&partner), Some(&owner));
            assert_eq!(u16::from(a) + u16::from(b), 100, "{:?}", setting);
        }
        for pct in 0..=100u8 {
            let shares = SplitResolver::new(&[]).resolve_shares(Some(pct), None, "x");
            assert_eq!(u16::from(shares.owner()) + u16::from(shares.partner()), 100);
        }
    }
}
