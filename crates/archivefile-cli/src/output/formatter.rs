//! Output formatter trait for CLI results.

use anyhow::Result;
use archivefile_core::ArchiveReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive creation result
    fn format_creation_result(&self, report: &ArchiveReport) -> Result<()>;

    /// Format the list of registered archive formats
    fn format_formats(&self, formats: &[&str]) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(JsonOutput::success("formats", vec!["zip"])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["operation"], "formats");
        assert_eq!(json["data"][0], "zip");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(JsonOutput::<()>::error("create", "boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
