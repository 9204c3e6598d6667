//! Error types for archive creation operations.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Kind of filesystem object a validation step expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Either a file or a directory.
    Any,
}

impl fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
            Self::Any => f.write_str("file or directory"),
        }
    }
}

/// Kind of filesystem object actually observed at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Anything else (socket, fifo, device).
    Other,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
            Self::Other => f.write_str("special file"),
        }
    }
}

/// Errors that can occur while building an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O operation on a specific path failed for a reason other than
    /// non-existence.
    #[error("I/O error at {path}: {source}")]
    Filesystem {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A referenced file, directory or path does not exist.
    #[error("could not find {expected} at path: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
        /// What the caller was looking for.
        expected: ExpectedKind,
    },

    /// A path exists but is not of the expected kind.
    #[error("expected {expected} at path {path}, found {found}")]
    WrongKind {
        /// The offending path.
        path: PathBuf,
        /// What the caller was looking for.
        expected: ExpectedKind,
        /// What is actually there.
        found: PathKind,
    },

    /// The current working directory could not be resolved.
    #[error("cannot resolve current working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// A path cannot be expressed relative to the base directory.
    #[error("cannot express {path} relative to {base}")]
    Relativize {
        /// The path to relativize.
        path: PathBuf,
        /// The base directory.
        base: PathBuf,
    },

    /// An inclusion lies outside the directory being archived.
    #[error("path {path} is outside source directory {root}")]
    OutsideSource {
        /// The offending inclusion.
        path: PathBuf,
        /// The directory being archived.
        root: PathBuf,
    },

    /// An archive entry name is empty, absolute, or escapes the archive root.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName {
        /// The rejected entry name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No archiver is registered for the requested format tag.
    #[error("unsupported archive format: {tag}")]
    UnsupportedFormat {
        /// The requested format tag.
        tag: String,
    },

    /// Compression level outside the supported range.
    #[error("invalid compression level {level}, must be 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Archive request or configuration is inconsistent.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// The archiver already ran an operation.
    #[error("archiver for {output} has already been used")]
    ArchiverFinished {
        /// Output path of the spent archiver.
        output: PathBuf,
    },
}

impl ArchiveError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if a referenced path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use archivefile_core::ArchiveError;
    /// use archivefile_core::error::ExpectedKind;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::NotFound {
    ///     path: PathBuf::from("missing.txt"),
    ///     expected: ExpectedKind::File,
    /// };
    /// assert!(err.is_not_found());
    /// assert!(!err.is_wrong_kind());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if a path exists but has the wrong kind.
    #[must_use]
    pub const fn is_wrong_kind(&self) -> bool {
        matches!(self, Self::WrongKind { .. })
    }

    /// Returns `true` for I/O failures other than non-existence.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Filesystem { .. } | Self::WorkingDirectory(_)
        )
    }

    /// Returns the offending path, if the error carries one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Filesystem { path, .. }
            | Self::NotFound { path, .. }
            | Self::WrongKind { path, .. }
            | Self::Relativize { path, .. }
            | Self::OutsideSource { path, .. } => Some(path),
            Self::ArchiverFinished { output } => Some(output),
            _ => None,
        }
    }
}
