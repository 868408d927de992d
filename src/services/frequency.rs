//! Frequency conversion
//!
//! Amounts move between frequencies through a monthly-normalized
//! intermediate: weekly x4, fortnightly x2, quarterly /3, yearly /12. The
//! whole chain is evaluated as one exact ratio and rounded once at the end.

use crate::models::{Frequency, Money};

/// Express `amount` (per `from`) as an amount per `to`
pub fn convert(amount: Money, from: Frequency, to: Frequency) -> Money {
    if from == to {
        return amount;
    }
    let (from_num, from_den) = from.monthly_factor();
    let (to_num, to_den) = to.monthly_factor();
    amount.mul_ratio(from_num * to_den, from_den * to_num)
}

/// Monthly equivalent of `amount` per `from`
pub fn to_monthly(amount: Money, from: Frequency) -> Money {
    convert(amount, from, Frequency::Monthly)
}

/// Amount per `to` of a monthly `amount`
pub fn from_monthly(amount: Money, to: Frequency) -> Money {
    convert(amount, Frequency::Monthly, to)
}
