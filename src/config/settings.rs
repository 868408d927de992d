//! User settings for Hearth
//!
//! Household preferences that shape every computation: timezone, period
//! granularity, reporting perspective and carryover policy.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::paths::HearthPaths;
use crate::error::{HearthError, HearthResult};
use crate::models::{PeriodType, ReportMode, UserId};
use crate::services::calendar::parse_timezone;
use crate::services::carryover::CarryoverMode;

/// User settings for Hearth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// IANA timezone the household lives in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub period_type: PeriodType,

    /// Whose view summaries are computed from
    #[serde(default)]
    pub report_mode: ReportMode,

    /// The requesting user in individual mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    #[serde(default)]
    pub carryover_mode: CarryoverMode,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Attach methodology sections to summaries
    #[serde(default)]
    pub include_methodology: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            timezone: default_timezone(),
            period_type: PeriodType::default(),
            report_mode: ReportMode::default(),
            user_id: None,
            carryover_mode: CarryoverMode::default(),
            currency_symbol: default_currency(),
            include_methodology: false,
        }
    }
}

impl Settings {
    /// The configured timezone
    pub fn tz(&self) -> HearthResult<Tz> {
        parse_timezone(&self.timezone)
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &HearthPaths) -> Result<Self, HearthError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            tracing::debug!(path = %settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| HearthError::Io(format!("Failed to read settings file: {}", e)))?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| HearthError::Config(format!("Failed to parse settings file: {}", e)))?;

        // Catch a bad zone at load time rather than mid-report
        settings.tz()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HearthPaths) -> Result<(), HearthError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HearthError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| HearthError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.period_type, PeriodType::Monthly);
        assert_eq!(settings.report_mode, ReportMode::Shared);
        assert_eq!(settings.carryover_mode, CarryoverMode::None);
        assert_eq!(settings.tz().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.period_type = PeriodType::Fortnightly;
        settings.timezone = "Australia/Sydney".into();
        settings.user_id = Some(UserId::new("alex"));
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.period_type, PeriodType::Fortnightly);
        assert_eq!(loaded.tz().unwrap(), chrono_tz::Australia::Sydney);
        assert_eq!(loaded.user_id, Some(UserId::new("alex")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"period_type": "weekly"}"#).unwrap();
        assert_eq!(settings.period_type, PeriodType::Weekly);
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_bad_timezone_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"timezone": "Mars/Olympus"}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, HearthError::InvalidTimezone(_)));
    }
}
