//! The `summary` command

use chrono::Utc;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::{read_json_file, OutputFormat};
use crate::config::Settings;
use crate::display::{format_budget_score, format_summary};
use crate::error::{HearthError, HearthResult};
use crate::export::{export_rows_csv, export_summary_json, export_summary_yaml};
use crate::models::{BudgetSnapshot, PeriodType, PreviousPeriodSnapshot, ReportMode, UserId};
use crate::reports::{BudgetScore, BudgetScoreInputs};
use crate::services::calendar::parse_timezone;
use crate::services::{CarryoverMode, PeriodService, SummaryRequest, SummaryService};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Path to a budget snapshot (JSON)
    pub snapshot: PathBuf,

    /// Period to summarize: a date inside it (YYYY-MM-DD), or current, last, next
    #[arg(short, long, default_value = "current")]
    pub date: String,

    /// Report mode (shared, individual); defaults to the configured mode
    #[arg(short, long)]
    pub mode: Option<ReportMode>,

    /// User the individual view is computed for
    #[arg(short, long)]
    pub user: Option<String>,

    /// Period type; defaults to the configured type
    #[arg(short = 't', long = "type")]
    pub period_type: Option<PeriodType>,

    /// IANA timezone; defaults to the configured zone
    #[arg(long)]
    pub tz: Option<String>,

    /// Carryover policy (none, positive-only, full)
    #[arg(long)]
    pub carryover: Option<CarryoverMode>,

    /// Previous period totals (JSON), used for carryover
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Explain how each total was produced
    #[arg(long)]
    pub methodology: bool,

    /// Append the budget score (table output only)
    #[arg(long)]
    pub score: bool,
}

/// Compute and print the summary for one period
pub fn handle_summary<W: Write>(settings: &Settings, args: &SummaryArgs, out: &mut W) -> HearthResult<()> {
    if args.score && args.format != OutputFormat::Table {
        return Err(HearthError::Validation(
            "--score is only available for table output".to_string(),
        ));
    }
    let snapshot: BudgetSnapshot = read_json_file(&args.snapshot)?;
    snapshot.validate()?;

    let tz = match &args.tz {
        Some(name) => parse_timezone(name)?,
        None => settings.tz()?,
    };
    let periods = PeriodService::new(args.period_type.unwrap_or(settings.period_type), tz);
    let period = periods.parse(&args.date, Utc::now())?;

    let mut request = SummaryRequest::from_settings(period, settings);
    if let Some(mode) = args.mode {
        request.report_mode = mode;
    }
    if let Some(user) = &args.user {
        request.user_id = Some(UserId::from(user.as_str()));
    }
    if let Some(carryover) = args.carryover {
        request.carryover_mode = carryover;
    }
    if let Some(path) = &args.previous {
        let previous: PreviousPeriodSnapshot = read_json_file(path)?;
        request = request.with_previous(previous);
    }
    if args.methodology {
        request = request.with_methodology();
    }
    if request.report_mode.is_individual() && request.user_id.is_none() {
        tracing::warn!("individual mode without a user; splits fall back to owner shares");
    }

    let summary = SummaryService::new(periods).compute(&snapshot, &request);

    match args.format {
        OutputFormat::Table => {
            write!(out, "{}", format_summary(&summary, &settings.currency_symbol))?;
            if args.score {
                let score = BudgetScore::compute(&BudgetScoreInputs::from_summary(&summary));
                writeln!(out)?;
                write!(out, "{}", format_budget_score(&score))?;
            }
        }
        OutputFormat::Json => export_summary_json(&summary, out, true)?,
        OutputFormat::Yaml => export_summary_yaml(&summary, out)?,
        OutputFormat::Csv => export_rows_csv(&summary, out)?,
    }
    Ok(())
}
