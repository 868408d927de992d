//! The `health` command

use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::{date_or_today, read_json_file, OutputFormat};
use crate::config::Settings;
use crate::display::format_health_report;
use crate::error::{HearthError, HearthResult};
use crate::models::BudgetSnapshot;
use crate::reports::{HealthReport, HealthReportInput};
use crate::services::{PeriodService, SummaryRequest, SummaryService};

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Path to the health inputs (JSON)
    pub input: PathBuf,

    /// Reference date for deadlines (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Budget snapshot (JSON) whose period containing the reference date
    /// supplies income, spending, bills and the budget score
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Score financial health and print recommendations
pub fn handle_health<W: Write>(settings: &Settings, args: &HealthArgs, out: &mut W) -> HearthResult<()> {
    let mut input: HealthReportInput = read_json_file(&args.input)?;
    let tz = settings.tz()?;
    let reference = date_or_today(args.date.as_deref(), tz)?;

    if let Some(path) = &args.snapshot {
        let snapshot: BudgetSnapshot = read_json_file(path)?;
        snapshot.validate()?;
        let periods = PeriodService::new(settings.period_type, tz);
        let period = periods.period_for_date(reference);
        let summary = SummaryService::new(periods)
            .compute(&snapshot, &SummaryRequest::from_settings(period, settings));
        tracing::debug!(period = %summary.period, "health inputs merged with budget summary");
        if input.inputs.liquid_balance.is_zero() {
            input.inputs.liquid_balance = snapshot.liquid_balance();
        }
        input = input.with_summary(&summary);
    }

    let report = HealthReport::generate(&input, reference);

    match args.format {
        OutputFormat::Table => {
            write!(out, "{}", format_health_report(&report, &settings.currency_symbol))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(out, &report)?,
        OutputFormat::Csv => {
            return Err(HearthError::Validation(
                "CSV output is only available for summaries".to_string(),
            ))
        }
    }
    Ok(())
}
