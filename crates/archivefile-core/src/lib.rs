//! Reproducible zip and tar.gz archive creation.
//!
//! `archivefile-core` packages literal content, a single file or a directory
//! tree into a fresh archive. Every input path is validated before use,
//! inclusion and exclusion lists are resolved against the working directory,
//! and entries carry a fixed timestamp so identical inputs yield identical
//! archives and checksums.
//!
//! # Examples
//!
//! ```no_run
//! use archivefile_core::ArchiverRegistry;
//! use std::path::Path;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ArchiverRegistry::builtin();
//! let mut archiver = registry
//!     .get("zip", Path::new("dist/lambda.zip"))
//!     .ok_or("zip is not registered")?;
//!
//! let report = archiver.archive_dir(
//!     Path::new("src"),
//!     &[],
//!     &[PathBuf::from("src/tests.py")],
//! )?;
//! println!("{} entries, sha256 {}", report.files_added(), report.output_sha256);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod digest;
pub mod error;
pub mod formats;
pub mod matching;
pub mod progress;
pub mod registry;
pub mod report;
pub mod request;
pub mod service;
pub mod validator;
pub mod walker;

pub use archiver::Archiver;
pub use archiver::ArchiverState;
pub use archiver::FileArchiver;
pub use archiver::TarGzArchiver;
pub use archiver::ZipArchiver;
pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use error::Result;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use registry::ArchiverRegistry;
pub use report::ArchiveReport;
pub use request::ArchiveRequest;
pub use service::ArchiveService;
pub use validator::PathValidator;
pub use validator::ValidatedPath;
