//! Declarative archive requests.
//!
//! A request names an output, a format tag and exactly one source. The raw
//! form mirrors the attribute names used by infrastructure tooling
//! (`type`, `output_path`, `source_dir`, `excludes`, ...) so request files
//! can be written by hand or generated. Conversion into [`ArchiveRequest`]
//! checks the combination once; everything downstream works with the typed
//! form.

use crate::ArchiveError;
use crate::Result;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// Untyped request as read from JSON.
///
/// # Examples
///
/// ```
/// use archivefile_core::ArchiveRequest;
/// use archivefile_core::request::RawArchiveRequest;
///
/// let raw: RawArchiveRequest = serde_json::from_str(
///     r#"{"type": "zip", "output_path": "lambda.zip", "source_dir": "src", "excludes": ["src/test.py"]}"#,
/// )?;
/// let request = ArchiveRequest::try_from(raw)?;
/// assert_eq!(request.format, "zip");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawArchiveRequest {
    /// Format tag.
    #[serde(rename = "type")]
    pub format: String,

    /// Where to write the archive.
    pub output_path: PathBuf,

    /// Literal content for a single-entry archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content: Option<String>,

    /// Entry name for `source_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content_filename: Option<String>,

    /// Single file to archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,

    /// Directory to archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Paths under `source_dir` to include. Empty means everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<PathBuf>,

    /// Paths to leave out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<PathBuf>,
}

/// What an archive is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// One entry holding literal bytes.
    Content {
        /// Entry content.
        content: Vec<u8>,
        /// Entry name.
        filename: String,
    },
    /// One entry holding a file, named by its base name.
    File {
        /// The file.
        path: PathBuf,
    },
    /// One entry per file under a directory.
    Directory {
        /// The directory.
        path: PathBuf,
        /// Paths to include; empty means every file.
        inclusions: Vec<PathBuf>,
        /// Paths to drop.
        exclusions: Vec<PathBuf>,
    },
}

/// A checked archive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Format tag, looked up in the registry at execution time.
    pub format: String,
    /// Where to write the archive.
    pub output_path: PathBuf,
    /// What to archive.
    pub source: ArchiveSource,
}

impl ArchiveRequest {
    /// Builds and checks a request in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidConfiguration`] if the combination of
    /// fields is inconsistent.
    pub fn new(
        format: impl Into<String>,
        output_path: impl Into<PathBuf>,
        source: ArchiveSource,
    ) -> Result<Self> {
        let request = Self {
            format: format.into(),
            output_path: output_path.into(),
            source,
        };
        request.check()?;
        Ok(request)
    }

    fn check(&self) -> Result<()> {
        if self.format.trim().is_empty() {
            return Err(invalid("type must not be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(invalid("output_path must not be empty"));
        }
        match &self.source {
            ArchiveSource::Content { filename, .. } if filename.is_empty() => Err(invalid(
                "source_content_filename must not be empty",
            )),
            ArchiveSource::File { path } | ArchiveSource::Directory { path, .. }
                if path.as_os_str().is_empty() =>
            {
                Err(invalid("source path must not be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl TryFrom<RawArchiveRequest> for ArchiveRequest {
    type Error = ArchiveError;

    fn try_from(raw: RawArchiveRequest) -> Result<Self> {
        let sources = [
            raw.source_content.is_some(),
            raw.source_file.is_some(),
            raw.source_dir.is_some(),
        ];
        match sources.iter().filter(|set| **set).count() {
            0 => {
                return Err(invalid(
                    "one of source_content, source_file or source_dir must be set",
                ));
            }
            1 => {}
            _ => {
                return Err(invalid(
                    "only one of source_content, source_file or source_dir may be set",
                ));
            }
        }

        if raw.source_dir.is_none() && !(raw.includes.is_empty() && raw.excludes.is_empty()) {
            return Err(invalid("includes and excludes require source_dir"));
        }
        if raw.source_content.is_none() && raw.source_content_filename.is_some() {
            return Err(invalid("source_content_filename requires source_content"));
        }

        let source = if let Some(content) = raw.source_content {
            let filename = raw
                .source_content_filename
                .ok_or_else(|| invalid("source_content requires source_content_filename"))?;
            ArchiveSource::Content {
                content: content.into_bytes(),
                filename,
            }
        } else if let Some(path) = raw.source_file {
            ArchiveSource::File { path }
        } else if let Some(path) = raw.source_dir {
            ArchiveSource::Directory {
                path,
                inclusions: raw.includes,
                exclusions: raw.excludes,
            }
        } else {
            return Err(invalid("no source set"));
        };

        Self::new(raw.format, raw.output_path, source)
    }
}

fn invalid(reason: &str) -> ArchiveError {
    ArchiveError::InvalidConfiguration {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ArchiveRequest> {
        let raw: RawArchiveRequest = serde_json::from_str(json).unwrap();
        ArchiveRequest::try_from(raw)
    }

    fn reason(err: ArchiveError) -> String {
        match err {
            ArchiveError::InvalidConfiguration { reason } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_content_request() {
        let request = parse(
            r#"{"type": "zip", "output_path": "out.zip",
                "source_content": "hello", "source_content_filename": "greeting.txt"}"#,
        )
        .unwrap();

        assert_eq!(request.output_path, PathBuf::from("out.zip"));
        assert_eq!(
            request.source,
            ArchiveSource::Content {
                content: b"hello".to_vec(),
                filename: "greeting.txt".to_string(),
            }
        );
    }

    #[test]
    fn test_dir_request_with_lists() {
        let request = parse(
            r#"{"type": "tar.gz", "output_path": "out.tgz", "source_dir": "app",
                "includes": ["app/src"], "excludes": ["app/src/test.py"]}"#,
        )
        .unwrap();

        assert_eq!(request.format, "tar.gz");
        assert_eq!(
            request.source,
            ArchiveSource::Directory {
                path: PathBuf::from("app"),
                inclusions: vec![PathBuf::from("app/src")],
                exclusions: vec![PathBuf::from("app/src/test.py")],
            }
        );
    }

    #[test]
    fn test_requires_exactly_one_source() {
        let err = parse(r#"{"type": "zip", "output_path": "out.zip"}"#).unwrap_err();
        assert!(reason(err).starts_with("one of"));

        let err = parse(
            r#"{"type": "zip", "output_path": "out.zip", "source_file": "a", "source_dir": "b"}"#,
        )
        .unwrap_err();
        assert!(reason(err).starts_with("only one"));
    }

    #[test]
    fn test_content_requires_filename() {
        let err = parse(r#"{"type": "zip", "output_path": "o.zip", "source_content": "x"}"#)
            .unwrap_err();
        assert!(reason(err).contains("source_content_filename"));

        let err = parse(
            r#"{"type": "zip", "output_path": "o.zip", "source_file": "a",
                "source_content_filename": "x"}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("requires source_content"));
    }

    #[test]
    fn test_lists_require_source_dir() {
        let err = parse(
            r#"{"type": "zip", "output_path": "o.zip", "source_file": "a", "excludes": ["b"]}"#,
        )
        .unwrap_err();
        assert_eq!(reason(err), "includes and excludes require source_dir");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let err = parse(r#"{"type": " ", "output_path": "o.zip", "source_file": "a"}"#).unwrap_err();
        assert!(reason(err).contains("type"));

        let err = parse(r#"{"type": "zip", "output_path": "", "source_file": "a"}"#).unwrap_err();
        assert!(reason(err).contains("output_path"));

        let err = ArchiveRequest::new("zip", "o.zip", ArchiveSource::File {
            path: PathBuf::new(),
        })
        .unwrap_err();
        assert!(reason(err).contains("source path"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<RawArchiveRequest, _> =
            serde_json::from_str(r#"{"type": "zip", "output_path": "o", "source": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_passes_construction() {
        let request = parse(r#"{"type": "rar", "output_path": "o.rar", "source_file": "a"}"#);
        assert!(request.is_ok());
    }
}
