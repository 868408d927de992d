//! Budget period service
//!
//! Computes period boundaries and navigates between periods. Buckets are laid
//! out inside each calendar month so that every period belongs to exactly one
//! month:
//!
//! - weekly: days 1-7, 8-14, 15-21 and 22 to month end (the last bucket runs
//!   7 to 10 days depending on month length)
//! - fortnightly: days 1-14 and 15 to month end
//! - monthly: the whole month
//!
//! All arithmetic is done on local dates in the household timezone and only
//! then converted to instants, so boundaries are local midnights.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use super::calendar::{components_in_zone, first_of_next_month, local_midnight};
use crate::config::settings::Settings;
use crate::error::{HearthError, HearthResult};
use crate::models::{PeriodRange, PeriodType};

/// Service for budget period computation
#[derive(Debug, Clone, Copy)]
pub struct PeriodService {
    period_type: PeriodType,
    tz: Tz,
}

/// First local day of the bucket containing `date`
pub fn bucket_start(period_type: PeriodType, date: NaiveDate) -> NaiveDate {
    let day = match period_type {
        PeriodType::Weekly => match date.day() {
            1..=7 => 1,
            8..=14 => 8,
            15..=21 => 15,
            _ => 22,
        },
        PeriodType::Fortnightly => {
            if date.day() <= 14 {
                1
            } else {
                15
            }
        }
        PeriodType::Monthly => 1,
    };
    date.with_day(day).unwrap_or(date)
}

/// First local day of the bucket after the one starting at `start`
pub fn next_bucket_start(period_type: PeriodType, start: NaiveDate) -> NaiveDate {
    let start = bucket_start(period_type, start);
    match period_type {
        PeriodType::Weekly if start.day() < 22 => start + Duration::days(7),
        PeriodType::Fortnightly if start.day() == 1 => start + Duration::days(14),
        _ => first_of_next_month(start),
    }
}

impl PeriodService {
    pub fn new(period_type: PeriodType, tz: Tz) -> Self {
        Self { period_type, tz }
    }

    /// Build from user settings
    pub fn from_settings(settings: &Settings) -> HearthResult<Self> {
        Ok(Self::new(settings.period_type, settings.tz()?))
    }

    pub fn period_type(&self) -> PeriodType {
        self.period_type
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The period containing `instant`
    pub fn period_for(&self, instant: DateTime<Utc>) -> PeriodRange {
        self.period_for_date(components_in_zone(instant, &self.tz))
    }

    /// The period containing the local date `date`
    pub fn period_for_date(&self, date: NaiveDate) -> PeriodRange {
        build_range(self.period_type, &self.tz, bucket_start(self.period_type, date))
    }

    /// The period immediately after `range`
    pub fn next(&self, range: &PeriodRange) -> PeriodRange {
        let start = self.local_start(range);
        let next = next_bucket_start(range.period_type, start);
        build_range(range.period_type, &self.tz, next)
    }

    /// The period immediately before `range`
    pub fn previous(&self, range: &PeriodRange) -> PeriodRange {
        let start = bucket_start(range.period_type, self.local_start(range));
        let last_day_before = start.pred_opt().unwrap_or(start);
        build_range(
            range.period_type,
            &self.tz,
            bucket_start(range.period_type, last_day_before),
        )
    }

    /// Inclusive local first and last dates of `range`
    pub fn local_bounds(&self, range: &PeriodRange) -> (NaiveDate, NaiveDate) {
        (
            components_in_zone(range.start, &self.tz),
            components_in_zone(range.end, &self.tz),
        )
    }

    /// `count` consecutive periods beginning with `range`
    pub fn periods_from(&self, range: &PeriodRange, count: usize) -> Vec<PeriodRange> {
        let mut periods = Vec::with_capacity(count);
        let mut current = range.clone();
        for _ in 0..count {
            let next = self.next(&current);
            periods.push(current);
            current = next;
        }
        periods
    }

    /// Parse a period reference relative to `reference`
    ///
    /// Accepts "current"/"now", "last"/"previous", "next" and any `YYYY-MM-DD`
    /// date, which selects the period containing it.
    pub fn parse(&self, s: &str, reference: DateTime<Utc>) -> HearthResult<PeriodRange> {
        let current = self.period_for(reference);
        match s.trim().to_lowercase().as_str() {
            "current" | "now" | "this" => Ok(current),
            "last" | "previous" | "prev" => Ok(self.previous(&current)),
            "next" => Ok(self.next(&current)),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(|d| self.period_for_date(d))
                .map_err(|_| HearthError::Parse(format!("Invalid period reference: {}", s))),
        }
    }

    fn local_start(&self, range: &PeriodRange) -> NaiveDate {
        components_in_zone(range.start, &self.tz)
    }
}

fn build_range(period_type: PeriodType, tz: &Tz, start: NaiveDate) -> PeriodRange {
    let next = next_bucket_start(period_type, start);
    let last_day = next.pred_opt().unwrap_or(start);
    let start_instant = local_midnight(start, tz);
    let end_instant = local_midnight(next, tz) - Duration::milliseconds(1);

    tracing::trace!(%period_type, %start, %next, "computed period range");

    PeriodRange {
        period_type,
        start: start_instant,
        end: end_instant,
        label: format_label(period_type, start, last_day),
    }
}

fn format_label(period_type: PeriodType, start: NaiveDate, last_day: NaiveDate) -> String {
    match period_type {
        PeriodType::Monthly => start.format("%B %Y").to_string(),
        PeriodType::Weekly | PeriodType::Fortnightly => format!(
            "{} - {}",
            start.format("%b %-d"),
            last_day.format("%b %-d, %Y")
        ),
    }
}
