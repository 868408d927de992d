//! Calendar commands: periods, occurrences and frequency conversion

use clap::Args;
use std::io::Write;

use super::{date_or_today, parse_date};
use crate::config::Settings;
use crate::display::{format_money, format_periods};
use crate::error::{HearthError, HearthResult};
use crate::models::{Frequency, Money, PeriodType, RecurrenceType};
use crate::services::calendar::parse_timezone;
use crate::services::{frequency, occurrences, upcoming, PeriodService};

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Date inside the first period (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Period type (weekly, fortnightly, monthly); defaults to the configured type
    #[arg(short = 't', long = "type")]
    pub period_type: Option<PeriodType>,

    /// IANA timezone; defaults to the configured zone
    #[arg(long)]
    pub tz: Option<String>,

    /// Number of periods to show
    #[arg(short, long, default_value = "1")]
    pub count: usize,
}

/// Print the period containing the date and the ones after it
pub fn handle_period<W: Write>(settings: &Settings, args: &PeriodArgs, out: &mut W) -> HearthResult<()> {
    let tz = match &args.tz {
        Some(name) => parse_timezone(name)?,
        None => settings.tz()?,
    };
    let service = PeriodService::new(args.period_type.unwrap_or(settings.period_type), tz);
    let date = date_or_today(args.date.as_deref(), tz)?;

    let first = service.period_for_date(date);
    let periods = service.periods_from(&first, args.count.max(1));
    writeln!(out, "{}", format_periods(&periods, tz))?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct OccurrencesArgs {
    /// First due date of the series (YYYY-MM-DD)
    #[arg(short, long)]
    pub anchor: String,

    /// Recurrence (one-time, weekly, fortnightly, monthly, quarterly, yearly)
    #[arg(short, long, default_value = "monthly")]
    pub recurrence: String,

    /// Start of the window (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// End of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Instead of a window, list the next N due dates from --from
    #[arg(short, long, conflicts_with = "to")]
    pub upcoming: Option<usize>,
}

/// Print due dates of a recurring expense
pub fn handle_occurrences<W: Write>(args: &OccurrencesArgs, out: &mut W) -> HearthResult<()> {
    let anchor = parse_date(&args.anchor)?;
    let recurrence = RecurrenceType::parse_lenient(&args.recurrence);
    let from = parse_date(&args.from)?;

    let dates = match (args.upcoming, &args.to) {
        (Some(n), _) => upcoming(anchor, recurrence, from, n),
        (None, Some(to)) => {
            let to = parse_date(to)?;
            occurrences(anchor, recurrence, from, to)
        }
        (None, None) => {
            return Err(HearthError::Validation(
                "Either --to or --upcoming is required".to_string(),
            ))
        }
    };

    for date in &dates {
        writeln!(out, "{}", date)?;
    }
    writeln!(out, "{} occurrences ({})", dates.len(), recurrence.as_str())?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Amount in cents
    #[arg(allow_negative_numbers = true)]
    pub cents: i64,

    /// Frequency of the amount given
    #[arg(long)]
    pub from: String,

    /// Frequency to convert to
    #[arg(long)]
    pub to: String,
}

/// Convert an amount between frequencies
pub fn handle_convert<W: Write>(settings: &Settings, args: &ConvertArgs, out: &mut W) -> HearthResult<()> {
    let from = Frequency::parse_lenient(&args.from);
    let to = Frequency::parse_lenient(&args.to);
    let amount = Money::from_cents(args.cents);
    let converted = frequency::convert(amount, from, to);

    tracing::debug!(%from, %to, %amount, %converted, "converted amount");
    writeln!(
        out,
        "{} {} = {} {} ({} cents)",
        format_money(amount, &settings.currency_symbol),
        from,
        format_money(converted, &settings.currency_symbol),
        to,
        converted.cents()
    )?;
    Ok(())
}
