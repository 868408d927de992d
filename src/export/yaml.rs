//! YAML export of a budget summary

use crate::error::{HearthError, HearthResult};
use crate::export::json::SummaryExport;
use crate::models::BudgetSummary;
use std::io::Write;

/// Export a summary to YAML, preceded by a comment header
pub fn export_summary_yaml<W: Write>(summary: &BudgetSummary, writer: &mut W) -> HearthResult<()> {
    let export = SummaryExport::new(summary.clone());

    writeln!(writer, "# Hearth budget summary for {}", summary.period)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| HearthError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export
pub fn import_summary_yaml(yaml_str: &str) -> HearthResult<SummaryExport> {
    let export: SummaryExport = serde_yaml::from_str(yaml_str)?;
    export.validate().map_err(HearthError::Validation)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_summary;

    #[test]
    fn test_yaml_export() {
        let mut output = Vec::new();
        export_summary_yaml(&sample_summary(), &mut output).unwrap();

        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# Hearth budget summary for March 2026"));
        assert!(yaml.contains("sub:housing:rent"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut output = Vec::new();
        export_summary_yaml(&sample_summary(), &mut output).unwrap();

        // Comment lines are ignored by the parser
        let imported = import_summary_yaml(&String::from_utf8(output).unwrap()).unwrap();
        assert_eq!(imported.summary.rows.len(), 2);
        assert_eq!(imported.metadata.overspent_count, 1);
    }
}
