//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use archivefile_core::ArchiveReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreationOutput<'a> {
    output_path: String,
    format: &'a str,
    files_added: usize,
    entries: &'a [String],
    bytes_read: u64,
    output_size: u64,
    output_sha256: &'a str,
    compression_ratio: f64,
    compression_percentage: f64,
    duplicates_skipped: usize,
    duration_ms: u128,
}

impl<'a> CreationOutput<'a> {
    fn new(report: &'a ArchiveReport) -> Self {
        Self {
            output_path: report.output_path.display().to_string(),
            format: &report.format,
            files_added: report.files_added(),
            entries: &report.entries,
            bytes_read: report.bytes_read,
            output_size: report.output_size,
            output_sha256: &report.output_sha256,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duplicates_skipped: report.duplicates_skipped,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, report: &ArchiveReport) -> Result<()> {
        Self::output(&JsonOutput::success("create", CreationOutput::new(report)))
    }

    fn format_formats(&self, formats: &[&str]) -> Result<()> {
        Self::output(&JsonOutput::success("formats", formats))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:?}"));
        let _ = Self::output(&output);
    }

    // Warnings go to stderr so stdout holds exactly one document.
    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        if let Ok(json) = serde_json::to_string(&output) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_creation_output_fields() {
        let report = ArchiveReport {
            output_path: PathBuf::from("dist/app.zip"),
            format: "zip".to_string(),
            entries: vec!["app/a.txt".to_string()],
            bytes_read: 400,
            output_size: 100,
            output_sha256: "ab".repeat(32),
            ..Default::default()
        };

        let json = serde_json::to_value(CreationOutput::new(&report)).unwrap();
        assert_eq!(json["output_path"], "dist/app.zip");
        assert_eq!(json["files_added"], 1);
        assert_eq!(json["entries"][0], "app/a.txt");
        assert_eq!(json["compression_ratio"], 4.0);
        assert_eq!(json["output_sha256"].as_str().map(str::len), Some(64));
    }
}
