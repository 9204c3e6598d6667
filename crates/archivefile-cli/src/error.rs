//! Error conversion utilities for CLI.
//!
//! Converts archivefile-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use archivefile_core::ArchiveError;
use archivefile_core::ArchiverRegistry;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, output: &Path) -> anyhow::Error {
    match err {
        ArchiveError::NotFound { path, expected } => {
            anyhow!(
                "Cannot create '{}': could not find {expected} at path: {}\n\
                 HINT: Relative paths are resolved against the current working directory.",
                output.display(),
                path.display()
            )
        }
        ArchiveError::WrongKind {
            path,
            expected,
            found,
        } => {
            anyhow!(
                "Cannot create '{}': expected {expected} at '{}', found {found}\n\
                 HINT: Use --source-file for single files and --source-dir for directories.",
                output.display(),
                path.display()
            )
        }
        ArchiveError::OutsideSource { path, root } => {
            anyhow!(
                "Included path '{}' is outside source directory '{}'\n\
                 HINT: Every --include must name a file or directory under --source-dir.",
                path.display(),
                root.display()
            )
        }
        ArchiveError::InvalidEntryName { name, reason } => {
            anyhow!(
                "Invalid entry name '{name}': {reason}\n\
                 HINT: Entry names must be relative paths without '..' components."
            )
        }
        ArchiveError::UnsupportedFormat { tag } => {
            let formats: Vec<&str> = ArchiverRegistry::builtin().formats().collect();
            anyhow!(
                "Archive format not supported: {tag}\n\
                 HINT: Supported formats: {}",
                formats.join(", ")
            )
        }
        ArchiveError::InvalidConfiguration { reason } => {
            anyhow!(
                "Invalid archive request: {reason}\n\
                 HINT: Set exactly one of source_content, source_file or source_dir."
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!("I/O error while writing '{}': {}", output.display(), io_err)
        }
        _ => anyhow::Error::from(err).context(format!("Error creating archive '{}'", output.display())),
    }
}

/// Adds context to a failed archive operation
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    output: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivefile_core::error::ExpectedKind;
    use archivefile_core::error::PathKind;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_not_found_error() {
        let err = ArchiveError::NotFound {
            path: PathBuf::from("src/missing.py"),
            expected: ExpectedKind::File,
        };
        let converted = convert_archive_error(err, Path::new("lambda.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("could not find file at path: src/missing.py"));
        assert!(msg.contains("lambda.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_wrong_kind_error() {
        let err = ArchiveError::WrongKind {
            path: PathBuf::from("src"),
            expected: ExpectedKind::File,
            found: PathKind::Directory,
        };
        let msg = format!("{:?}", convert_archive_error(err, Path::new("out.zip")));
        assert!(msg.contains("found directory"));
        assert!(msg.contains("--source-dir"));
    }

    #[test]
    fn test_convert_unsupported_format_lists_formats() {
        let err = ArchiveError::UnsupportedFormat {
            tag: "rar".to_string(),
        };
        let msg = format!("{:?}", convert_archive_error(err, Path::new("out.rar")));
        assert!(msg.contains("rar"));
        assert!(msg.contains("tar.gz, zip"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_archive_error(ArchiveError::Io(io_err), Path::new("out.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_other_errors_keep_context() {
        let err = ArchiveError::InvalidCompressionLevel { level: 11 };
        let msg = format!("{:?}", convert_archive_error(err, Path::new("out.zip")));
        assert!(msg.contains("Error creating archive 'out.zip'"));
        assert!(msg.contains("invalid compression level 11"));
    }
}
