//! Archive operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a completed archiving operation.
///
/// # Examples
///
/// ```
/// use archivefile_core::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.entries.push("main.py".to_string());
/// report.bytes_read = 1000;
/// report.output_size = 250;
///
/// assert_eq!(report.files_added(), 1);
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Path of the written archive.
    pub output_path: PathBuf,

    /// Format tag of the archive.
    pub format: String,

    /// Entry names in the order they were written.
    pub entries: Vec<String>,

    /// Uncompressed bytes read into the archive.
    pub bytes_read: u64,

    /// Size of the finished archive in bytes.
    pub output_size: u64,

    /// Lowercase hex SHA-256 of the finished archive.
    pub output_sha256: String,

    /// Entries dropped because an earlier entry had the same name.
    pub duplicates_skipped: usize,

    /// Wall-clock duration of the operation.
    pub duration: Duration,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries written.
    #[must_use]
    pub fn files_added(&self) -> usize {
        self.entries.len()
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.output_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.output_size as f64
    }

    /// Returns the space saved as a percentage of the uncompressed size.
    ///
    /// Negative when container overhead exceeds the savings; 0.0 if nothing
    /// was read.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        (1.0 - self.output_size as f64 / self.bytes_read as f64) * 100.0
    }
}
