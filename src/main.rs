use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use tracing_subscriber::EnvFilter;

use hearth::cli::{
    handle_convert, handle_health, handle_occurrences, handle_period, handle_summary,
    ConvertArgs, HealthArgs, OccurrencesArgs, PeriodArgs, SummaryArgs,
};
use hearth::config::{HearthPaths, Settings};
use hearth::models::{PeriodType, UserId};
use hearth::services::calendar::parse_timezone;

#[derive(Parser)]
#[command(
    name = "hearth",
    author = "Kaylee Beyene",
    version,
    about = "Household budgeting engine",
    long_about = "Hearth computes a household budget for one period: income, \
                  assignments, recurring expenses and spending, reconciled into \
                  category rows, with shared-expense splits and carryover."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the period containing a date and the ones after it
    Period(PeriodArgs),

    /// List due dates of a recurring expense
    #[command(alias = "due")]
    Occurrences(OccurrencesArgs),

    /// Convert an amount between frequencies
    Convert(ConvertArgs),

    /// Compute the budget summary for a snapshot
    Summary(SummaryArgs),

    /// Score financial health and list recommendations
    Health(HealthArgs),

    /// Write a settings file with the household's preferences
    Init {
        /// IANA timezone of the household
        #[arg(long)]
        timezone: Option<String>,
        /// Budget period type (weekly, fortnightly, monthly)
        #[arg(short = 't', long = "type")]
        period_type: Option<PeriodType>,
        /// Default user for individual reports
        #[arg(short, long)]
        user: Option<String>,
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HEARTH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = HearthPaths::new()?;
    let settings = Settings::load_or_create(&paths)
        .with_context(|| format!("Failed to load settings from {}", paths.settings_file().display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Period(args)) => handle_period(&settings, &args, &mut out)?,
        Some(Commands::Occurrences(args)) => handle_occurrences(&args, &mut out)?,
        Some(Commands::Convert(args)) => handle_convert(&settings, &args, &mut out)?,
        Some(Commands::Summary(args)) => handle_summary(&settings, &args, &mut out)
            .with_context(|| format!("Failed to summarize {}", args.snapshot.display()))?,
        Some(Commands::Health(args)) => handle_health(&settings, &args, &mut out)
            .with_context(|| format!("Failed to score {}", args.input.display()))?,
        Some(Commands::Init {
            timezone,
            period_type,
            user,
            force,
        }) => {
            if paths.is_initialized() && !force {
                anyhow::bail!(
                    "Settings already exist at {}; pass --force to overwrite",
                    paths.settings_file().display()
                );
            }
            let mut settings = settings;
            if let Some(tz) = timezone {
                parse_timezone(&tz)?;
                settings.timezone = tz;
            }
            if let Some(period_type) = period_type {
                settings.period_type = period_type;
            }
            if let Some(user) = user {
                settings.user_id = Some(UserId::from(user));
            }
            settings.save(&paths)?;
            writeln!(out, "Initialized Hearth at: {}", paths.base_dir().display())?;
        }
        Some(Commands::Config) => {
            writeln!(out, "Hearth Configuration")?;
            writeln!(out, "====================")?;
            writeln!(out, "Base directory:   {}", paths.base_dir().display())?;
            writeln!(out, "Settings file:    {}", paths.settings_file().display())?;
            writeln!(out, "Exports:          {}", paths.exports_dir().display())?;
            writeln!(out, "Initialized:      {}", paths.is_initialized())?;
            writeln!(out)?;
            writeln!(out, "Settings:")?;
            writeln!(out, "  Timezone:       {}", settings.timezone)?;
            writeln!(out, "  Period type:    {}", settings.period_type)?;
            writeln!(out, "  Report mode:    {}", settings.report_mode)?;
            writeln!(
                out,
                "  User:           {}",
                settings.user_id.as_ref().map(|u| u.to_string()).unwrap_or_else(|| "-".to_string())
            )?;
            writeln!(out, "  Carryover:      {}", settings.carryover_mode)?;
            writeln!(out, "  Currency:       {}", settings.currency_symbol)?;
            writeln!(out, "  Methodology:    {}", settings.include_methodology)?;
        }
        None => {
            writeln!(out, "Hearth - household budgeting engine")?;
            writeln!(out)?;
            writeln!(out, "Run 'hearth --help' for usage information.")?;
        }
    }

    Ok(())
}
