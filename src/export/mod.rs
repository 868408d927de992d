//! Export module for Hearth
//!
//! Writes computed summaries in machine-readable formats:
//! - JSON: versioned envelope around the full summary
//! - YAML: the same envelope, human-readable
//! - CSV: one record per budget row

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_rows_csv;
pub use json::{
    export_summary_json, import_summary_json, ExportMetadata, SummaryExport,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_summary_yaml, import_summary_yaml};
