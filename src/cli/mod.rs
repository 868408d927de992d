//! CLI command handlers
//!
//! Bridges clap argument parsing with the engine. Every handler reads its
//! inputs explicitly and writes to the supplied writer; only the binary
//! decides that "today" is the default reference date.

pub mod calendar;
pub mod health;
pub mod summary;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{HearthError, HearthResult};
use crate::services::calendar::components_in_zone;

pub use calendar::{
    handle_convert, handle_occurrences, handle_period, ConvertArgs, OccurrencesArgs, PeriodArgs,
};
pub use health::{handle_health, HealthArgs};
pub use summary::{handle_summary, SummaryArgs};

/// Output format for report commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Csv,
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> HearthResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        HearthError::Parse(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}

/// The date given on the command line, or today's local date in `tz`
pub fn date_or_today(date: Option<&str>, tz: Tz) -> HearthResult<NaiveDate> {
    match date {
        Some(s) => parse_date(s),
        None => Ok(components_in_zone(Utc::now(), &tz)),
    }
}

/// Read and deserialize a JSON input file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> HearthResult<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| HearthError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| HearthError::Json(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2026-02-28 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(matches!(parse_date("28/02/2026"), Err(HearthError::Parse(_))));
    }

    #[test]
    fn test_date_or_today_prefers_argument() {
        let date = date_or_today(Some("2026-01-15"), chrono_tz::UTC).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn test_read_json_file_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json_file::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));

        let missing = read_json_file::<serde_json::Value>(&temp.path().join("nope.json"));
        assert!(matches!(missing, Err(HearthError::Io(_))));
    }
}
