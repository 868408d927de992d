//! Recurrence projection
//!
//! Projects a recurring due date onto arbitrary windows of local dates. The
//! projector jumps straight to the first occurrence on or after the window
//! start, then steps one interval at a time, so the work is proportional to
//! the number of occurrences and never to the number of days.
//!
//! Month-based frequencies keep the anchor's day of month and clamp it to the
//! length of each candidate month: a bill due on the 31st falls on Feb 28,
//! Apr 30, and is back on the 31st in May.

use chrono::{Datelike, Duration, NaiveDate};

use super::calendar::days_in_month;
use crate::models::{parse_anchor_date, RecurrenceType};

/// Iterator over due dates on or after a starting date, in order
#[derive(Debug, Clone)]
pub struct Occurrences {
    step: Step,
}

#[derive(Debug, Clone)]
enum Step {
    Once(Option<NaiveDate>),
    Days { next: Option<NaiveDate>, days: i64 },
    Months { index: i64, months: i64, day: u32 },
}

impl Occurrences {
    /// Due dates of `recurrence` anchored at `anchor`, starting at `from`
    pub fn starting_at(anchor: NaiveDate, recurrence: RecurrenceType, from: NaiveDate) -> Self {
        let step = match recurrence.frequency() {
            None => Step::Once((anchor >= from).then_some(anchor)),
            Some(freq) => {
                if let Some(days) = freq.day_interval() {
                    let diff = (from - anchor).num_days();
                    let k = ceil_div(diff, days);
                    Step::Days {
                        next: anchor.checked_add_signed(Duration::days(k * days)),
                        days,
                    }
                } else {
                    let months = i64::from(freq.month_interval().unwrap_or(1));
                    let anchor_index = month_index(anchor);
                    let k = ceil_div(month_index(from) - anchor_index, months);
                    Step::Months {
                        index: anchor_index + k * months,
                        months,
                        day: anchor.day(),
                    }
                }
            }
        };
        let mut iter = Self { step };
        iter.skip_before(from);
        iter
    }

    // Only a clamped month candidate in `from`'s own month can precede it.
    fn skip_before(&mut self, from: NaiveDate) {
        if let Step::Months { index, months, day } = &mut self.step {
            if let Some(candidate) = date_in_month(*index, *day) {
                if candidate < from {
                    *index += *months;
                }
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match &mut self.step {
            Step::Once(date) => date.take(),
            Step::Days { next, days } => {
                let current = (*next)?;
                *next = current.checked_add_signed(Duration::days(*days));
                Some(current)
            }
            Step::Months { index, months, day } => {
                let current = date_in_month(*index, *day)?;
                *index += *months;
                Some(current)
            }
        }
    }
}

/// Due dates inside the inclusive local window `[start, end]`
pub fn occurrences(
    anchor: NaiveDate,
    recurrence: RecurrenceType,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    Occurrences::starting_at(anchor, recurrence, start)
        .take_while(|d| *d <= end)
        .collect()
}

/// Number of due dates inside the inclusive local window `[start, end]`
pub fn count_occurrences(
    anchor: NaiveDate,
    recurrence: RecurrenceType,
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    if start > end {
        return 0;
    }
    let count = Occurrences::starting_at(anchor, recurrence, start)
        .take_while(|d| *d <= end)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Like [`count_occurrences`] for a raw anchor string; unparseable anchors
/// have no occurrences
pub fn count_occurrences_str(
    anchor: &str,
    recurrence: RecurrenceType,
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    match parse_anchor_date(anchor) {
        Some(date) => count_occurrences(date, recurrence, start, end),
        None => {
            tracing::debug!(anchor, "unparseable recurrence anchor, no occurrences");
            0
        }
    }
}

/// The next `count` due dates on or after `from`, for timelines
pub fn upcoming(
    anchor: NaiveDate,
    recurrence: RecurrenceType,
    from: NaiveDate,
    count: usize,
) -> Vec<NaiveDate> {
    Occurrences::starting_at(anchor, recurrence, from)
        .take(count)
        .collect()
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn date_in_month(index: i64, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n.div_euclid(d);
    if n.rem_euclid(d) == 0 {
        q
    } else {
        q + 1
    }
}
