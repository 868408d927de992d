//! JSON export of a budget summary
//!
//! Wraps the summary in a versioned envelope so consumers can detect
//! incompatible layouts.

use crate::error::{HearthError, HearthResult};
use crate::models::BudgetSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A summary together with export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub summary: BudgetSummary,

    pub metadata: ExportMetadata,
}

/// Counts derived from the summary, for quick inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub row_count: usize,
    pub overspent_count: usize,
    /// Rows whose budgeted amount came from a recurring expense
    pub expense_default_count: usize,
    pub shared_row_count: usize,
}

impl SummaryExport {
    pub fn new(summary: BudgetSummary) -> Self {
        Self::at(summary, Utc::now())
    }

    /// Build an export with an explicit timestamp
    pub fn at(summary: BudgetSummary, exported_at: DateTime<Utc>) -> Self {
        let metadata = ExportMetadata {
            row_count: summary.rows.len(),
            overspent_count: summary.overspent_rows().count(),
            expense_default_count: summary.rows.iter().filter(|r| r.is_expense_default).count(),
            shared_row_count: summary
                .rows
                .iter()
                .filter(|r| r.is_shared == Some(true))
                .count(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            summary,
            metadata,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = BTreeSet::new();
        for row in &self.summary.rows {
            if !seen.insert(row.id.as_str()) {
                return Err(format!("Duplicate row id {}", row.id));
            }
            if row.available != row.budgeted - row.spent {
                return Err(format!("Row {} available does not reconcile", row.id));
            }
        }

        let summary = &self.summary;
        if summary.tbb != summary.income + summary.carryover - summary.budgeted {
            return Err("To-be-budgeted does not reconcile with totals".to_string());
        }

        Ok(())
    }
}

/// Export a summary to JSON
pub fn export_summary_json<W: Write>(
    summary: &BudgetSummary,
    writer: &mut W,
    pretty: bool,
) -> HearthResult<()> {
    let export = SummaryExport::new(summary.clone());

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| HearthError::Export(e.to_string()))?;
    writeln!(writer)?;

    Ok(())
}

/// Read back a JSON export
pub fn import_summary_json(json_str: &str) -> HearthResult<SummaryExport> {
    let export: SummaryExport = serde_json::from_str(json_str)?;
    export.validate().map_err(HearthError::Validation)?;
    Ok(export)
}
