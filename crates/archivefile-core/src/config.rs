//! Configuration for archive creation.

use crate::ArchiveError;
use crate::Result;
use serde::Deserialize;
use serde::Serialize;

/// How exclusion paths are compared against candidate paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A candidate is excluded only when an exclusion names exactly the same
    /// normalized relative path.
    #[default]
    Exact,
    /// A candidate is also excluded when it lies under an excluded directory.
    Prefix,
}

/// Directory that archive entry names are computed against when archiving a
/// directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRoot {
    /// Entry names are relative to the validator's base, normally the
    /// process working directory.
    #[default]
    WorkingDirectory,
    /// Entry names are relative to the directory being archived.
    SourceDirectory,
}

/// Options controlling how archives are written.
///
/// # Examples
///
/// ```
/// use archivefile_core::ArchiveConfig;
/// use archivefile_core::config::MatchMode;
///
/// let config = ArchiveConfig::default()
///     .with_compression_level(9)
///     .with_match_mode(MatchMode::Prefix);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Compression level, 0 (stored) to 9 (best).
    ///
    /// `None` uses the format default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Record source file permissions on entries.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Descend into symlinked directories while walking a source directory.
    ///
    /// Symlinks to files are always archived as the file they point to.
    ///
    /// Default: `false`.
    pub follow_symlinks: bool,

    /// Exclusion comparison mode.
    ///
    /// Default: [`MatchMode::Exact`].
    pub match_mode: MatchMode,

    /// Anchor for directory entry names.
    ///
    /// Default: [`EntryRoot::WorkingDirectory`].
    pub entry_root: EntryRoot,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            preserve_permissions: true,
            follow_symlinks: false,
            match_mode: MatchMode::Exact,
            entry_root: EntryRoot::WorkingDirectory,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range levels are reported by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether file permissions are recorded.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets whether symlinked directories are walked.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the exclusion match mode.
    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Sets the anchor for directory entry names.
    #[must_use]
    pub fn with_entry_root(mut self, root: EntryRoot) -> Self {
        self.entry_root = root;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidCompressionLevel`] if the compression
    /// level is above 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
