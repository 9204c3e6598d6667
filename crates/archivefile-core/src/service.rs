//! Request execution against a registry.

use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveReport;
use crate::ArchiveRequest;
use crate::Archiver;
use crate::ArchiverRegistry;
use crate::PathValidator;
use crate::ProgressCallback;
use crate::Result;
use crate::request::ArchiveSource;
use std::path::Path;

/// Runs archive requests with a fixed registry, configuration and validator.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::ArchiveRequest;
/// use archivefile_core::ArchiveService;
/// use archivefile_core::request::ArchiveSource;
///
/// let service = ArchiveService::default();
/// let request = ArchiveRequest::new(
///     "zip",
///     "greeting.zip",
///     ArchiveSource::Content {
///         content: b"hello".to_vec(),
///         filename: "greeting.txt".to_string(),
///     },
/// )?;
/// let report = service.execute(&request)?;
/// println!("{}", report.output_sha256);
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveService {
    registry: ArchiverRegistry,
    config: ArchiveConfig,
    validator: PathValidator,
}

impl ArchiveService {
    /// Service over `registry` with default configuration.
    #[must_use]
    pub fn new(registry: ArchiverRegistry) -> Self {
        Self {
            registry,
            config: ArchiveConfig::default(),
            validator: PathValidator::current_dir(),
        }
    }

    /// Replaces the configuration handed to new archivers.
    #[must_use]
    pub fn with_config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the path validator handed to new archivers.
    #[must_use]
    pub fn with_validator(mut self, validator: PathValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The registry in use.
    pub const fn registry(&self) -> &ArchiverRegistry {
        &self.registry
    }

    /// The configuration handed to new archivers.
    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Fresh archiver for `tag` bound to `output`, or `None` if the tag is
    /// not registered.
    pub fn archiver(&self, tag: &str, output: &Path) -> Option<Box<dyn Archiver>> {
        self.registry
            .get_with(tag, output, self.config.clone(), self.validator.clone())
    }

    /// Executes `request` with a fresh archiver.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsupportedFormat`] for unregistered tags and
    /// any error raised by the archiving operation.
    pub fn execute(&self, request: &ArchiveRequest) -> Result<ArchiveReport> {
        self.run(request, None)
    }

    /// Executes `request`, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// Same as [`ArchiveService::execute`].
    pub fn execute_with_progress(
        &self,
        request: &ArchiveRequest,
        progress: Box<dyn ProgressCallback>,
    ) -> Result<ArchiveReport> {
        self.run(request, Some(progress))
    }

    fn run(
        &self,
        request: &ArchiveRequest,
        progress: Option<Box<dyn ProgressCallback>>,
    ) -> Result<ArchiveReport> {
        let mut archiver = self
            .archiver(&request.format, &request.output_path)
            .ok_or_else(|| ArchiveError::UnsupportedFormat {
                tag: request.format.clone(),
            })?;
        if let Some(progress) = progress {
            archiver.set_progress(progress);
        }

        tracing::debug!(
            format = %request.format,
            output = %request.output_path.display(),
            "executing archive request"
        );

        match &request.source {
            ArchiveSource::Content { content, filename } => {
                archiver.archive_content(content, filename)
            }
            ArchiveSource::File { path } => archiver.archive_file(path),
            ArchiveSource::Directory {
                path,
                inclusions,
                exclusions,
            } => archiver.archive_dir(path, inclusions, exclusions),
        }
    }
}
