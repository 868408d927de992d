//! Timezone calendar arithmetic
//!
//! Converts instants to local calendar dates and local dates back to the
//! instant of their local midnight. Everything period-related is computed on
//! local dates first and only converted to instants at the end.

use chrono::{DateTime, Duration, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{HearthError, HearthResult};

/// Parse an IANA timezone name such as `Australia/Sydney`
pub fn parse_timezone(name: &str) -> HearthResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| HearthError::InvalidTimezone(name.to_string()))
}

/// The local calendar date of `instant` in `tz`
pub fn components_in_zone<Z: TimeZone>(instant: DateTime<Utc>, tz: &Z) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Offset of `tz` from UTC, in seconds, at `instant`
pub fn offset_seconds<Z: TimeZone>(tz: &Z, instant: DateTime<Utc>) -> i64 {
    i64::from(
        tz.offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc(),
    )
}

/// The instant at which `date` begins in `tz`
///
/// Starts from UTC midnight, subtracts the zone offset measured there, then
/// re-measures at the result. If a DST transition sits between the two
/// measurements the second offset is the right one, so the subtraction is
/// redone with it, unless that lands on the previous local day. That happens
/// where local midnight does not exist (zones that spring forward at 00:00),
/// and the first pass is then the first instant of the local day.
pub fn local_midnight<Z: TimeZone>(date: NaiveDate, tz: &Z) -> DateTime<Utc> {
    let guess = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let first = offset_seconds(tz, guess);
    let candidate = guess - Duration::seconds(first);
    let second = offset_seconds(tz, candidate);
    if second == first {
        return candidate;
    }
    let retry = guess - Duration::seconds(second);
    if components_in_zone(retry, tz) == date {
        retry
    } else {
        candidate
    }
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| chrono::Datelike::day(&d))
        .unwrap_or(31)
}

/// First day of the month after `date`'s month
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}
