//! Single-use archivers bound to one output path.
//!
//! An archiver runs exactly one of [`Archiver::archive_content`],
//! [`Archiver::archive_file`] or [`Archiver::archive_dir`]. Each operation
//! validates its inputs, plans the entries, writes a fresh archive, closes it
//! and checksums the result before returning. Any error aborts the operation
//! and leaves the output in an unusable state.

use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveReport;
use crate::PathValidator;
use crate::ProgressCallback;
use crate::Result;
use crate::config::EntryRoot;
use crate::digest::digest_file;
use crate::error::ExpectedKind;
use crate::error::PathKind;
use crate::formats::EntryHeader;
use crate::formats::EntrySink;
use crate::formats::TarGzSink;
use crate::formats::ZipSink;
use crate::formats::entry_name;
use crate::matching::resolve_matches;
use crate::matching::subtract;
use crate::progress::NoopProgress;
use crate::progress::ProgressReader;
use crate::validator::relative_to;
use crate::walker::collect_files;
use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Writes one archive to a fixed output path.
pub trait Archiver: Send {
    /// Output path this archiver is bound to.
    fn output_path(&self) -> &Path;

    /// Format tag of the archives this archiver writes.
    fn format(&self) -> &'static str;

    /// Returns `true` once an operation has been attempted.
    fn is_finished(&self) -> bool;

    /// Attaches a progress callback for the upcoming operation.
    fn set_progress(&mut self, progress: Box<dyn ProgressCallback>);

    /// Writes a single entry named `entry_name` holding `content`.
    fn archive_content(&mut self, content: &[u8], entry_name: &str) -> Result<ArchiveReport>;

    /// Writes a single entry holding the file at `path`, named by its base
    /// name.
    fn archive_file(&mut self, path: &Path) -> Result<ArchiveReport>;

    /// Writes one entry per file under `path`.
    ///
    /// With empty `inclusions` every file under `path` is a candidate;
    /// otherwise only the listed files (and the files under listed
    /// directories) are. Candidates equal to an exclusion are dropped.
    fn archive_dir(
        &mut self,
        path: &Path,
        inclusions: &[PathBuf],
        exclusions: &[PathBuf],
    ) -> Result<ArchiveReport>;
}

/// Lifecycle state of an archiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiverState {
    /// No operation has run yet.
    Ready,
    /// An operation ran; the archiver cannot be reused.
    Finished,
}

/// Archiver writing ZIP files.
pub type ZipArchiver = FileArchiver<ZipSink>;

/// Archiver writing gzip-compressed TAR files.
pub type TarGzArchiver = FileArchiver<TarGzSink>;

/// Archiver generic over the container format.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::Archiver;
/// use archivefile_core::ZipArchiver;
///
/// let mut archiver = ZipArchiver::new("greeting.zip");
/// let report = archiver.archive_content(b"hello", "greeting.txt")?;
/// assert_eq!(report.entries, vec!["greeting.txt"]);
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
pub struct FileArchiver<S> {
    output: PathBuf,
    config: ArchiveConfig,
    validator: PathValidator,
    state: ArchiverState,
    progress: Box<dyn ProgressCallback>,
    sink: PhantomData<fn() -> S>,
}

impl<S: EntrySink> FileArchiver<S> {
    /// Archiver with default configuration, anchored to the working
    /// directory.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(output: P) -> Self {
        Self::with_settings(output, ArchiveConfig::default(), PathValidator::current_dir())
    }

    /// Archiver with explicit configuration and path validator.
    #[must_use]
    pub fn with_settings<P: Into<PathBuf>>(
        output: P,
        config: ArchiveConfig,
        validator: PathValidator,
    ) -> Self {
        Self {
            output: output.into(),
            config,
            validator,
            state: ArchiverState::Ready,
            progress: Box::new(NoopProgress),
            sink: PhantomData,
        }
    }

    /// Attaches a progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ArchiverState {
        self.state
    }

    /// Marks the archiver as used and checks the configuration.
    fn begin(&mut self) -> Result<Instant> {
        if self.state == ArchiverState::Finished {
            return Err(ArchiveError::ArchiverFinished {
                output: self.output.clone(),
            });
        }
        self.state = ArchiverState::Finished;
        self.config.validate()?;
        Ok(Instant::now())
    }

    fn plan_file(&self, source: &Path, name: String) -> Result<PlannedEntry> {
        let metadata = fs::metadata(source).map_err(|e| ArchiveError::filesystem(source, e))?;
        Ok(PlannedEntry {
            name,
            source: EntrySource::File(source.to_path_buf()),
            size: metadata.len(),
            mode: self.mode_of(&metadata),
        })
    }

    #[cfg(unix)]
    fn mode_of(&self, metadata: &fs::Metadata) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        self.config
            .preserve_permissions
            .then(|| metadata.permissions().mode())
    }

    #[cfg(not(unix))]
    fn mode_of(&self, _metadata: &fs::Metadata) -> Option<u32> {
        None
    }

    fn content_entries(content: &[u8], name: &str) -> Result<Vec<PlannedEntry>> {
        let name = entry_name(Path::new(name))?;
        Ok(vec![PlannedEntry {
            name,
            source: EntrySource::Bytes(content.to_vec()),
            size: content.len() as u64,
            mode: None,
        }])
    }

    fn file_entries(&self, path: &Path) -> Result<Vec<PlannedEntry>> {
        let file = self.validator.validate_file(path)?;
        let base_name = file.path().file_name().map(Path::new).ok_or_else(|| {
            ArchiveError::InvalidEntryName {
                name: path.to_string_lossy().into_owned(),
                reason: "has no file name",
            }
        })?;
        let name = entry_name(base_name)?;
        Ok(vec![self.plan_file(file.path(), name)?])
    }

    fn dir_entries(
        &self,
        path: &Path,
        inclusions: &[PathBuf],
        exclusions: &[PathBuf],
    ) -> Result<Vec<PlannedEntry>> {
        let root = self.validator.validate_directory(path)?;
        let follow = self.config.follow_symlinks;

        let candidates = if inclusions.is_empty() {
            collect_files(root.path(), follow)?
        } else {
            let included = inclusions
                .iter()
                .map(|inclusion| {
                    let validated = self.validator.validate_and_relativize(inclusion)?;
                    if validated.path().starts_with(root.path()) {
                        Ok(validated)
                    } else {
                        Err(ArchiveError::OutsideSource {
                            path: inclusion.clone(),
                            root: path.to_path_buf(),
                        })
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let excluded = exclusions
                .iter()
                .map(|exclusion| self.validator.validate_and_relativize(exclusion))
                .collect::<Result<Vec<_>>>()?;

            // Inclusions are matched as given, then again once directories are expanded.
            let mut files = Vec::new();
            for validated in subtract(included, &excluded, self.config.match_mode) {
                if validated.kind() == PathKind::Directory {
                    files.extend(collect_files(validated.path(), follow)?);
                } else {
                    files.push(validated.into_path());
                }
            }
            files
        };

        let output = self.validator.resolve(&self.output)?;
        let candidates: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|candidate| {
                let is_output = *candidate == output;
                if is_output {
                    tracing::debug!(path = %candidate.display(), "skipping archive output");
                }
                !is_output
            })
            .collect();

        let resolved = resolve_matches(
            &self.validator,
            &candidates,
            exclusions,
            self.config.match_mode,
        )?;

        let entry_base = match self.config.entry_root {
            EntryRoot::WorkingDirectory if root.relative().starts_with("..") => {
                tracing::warn!(
                    source = %root.path().display(),
                    "source directory is outside the working directory; naming entries relative to it"
                );
                root.path().to_path_buf()
            }
            EntryRoot::WorkingDirectory => self.validator.base()?,
            EntryRoot::SourceDirectory => root.path().to_path_buf(),
        };

        resolved
            .iter()
            .map(|file| {
                if file.kind() != PathKind::File {
                    return Err(ArchiveError::WrongKind {
                        path: file.path().to_path_buf(),
                        expected: ExpectedKind::File,
                        found: file.kind(),
                    });
                }
                let relative = relative_to(file.path(), &entry_base).ok_or_else(|| {
                    ArchiveError::Relativize {
                        path: file.path().to_path_buf(),
                        base: entry_base.clone(),
                    }
                })?;
                self.plan_file(file.path(), entry_name(&relative)?)
            })
            .collect()
    }

    fn create_output(&self) -> Result<(PathBuf, File)> {
        let output = self.validator.resolve(&self.output)?;
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::filesystem(parent, e))?;
        }
        let file = File::create(&output).map_err(|e| ArchiveError::filesystem(&output, e))?;
        Ok((output, file))
    }

    fn write(&mut self, entries: Vec<PlannedEntry>, started: Instant) -> Result<ArchiveReport> {
        let (output, file) = self.create_output()?;
        let mut sink = S::create(file, &self.config)?;

        let mut report = ArchiveReport {
            output_path: output.clone(),
            format: S::TAG.to_string(),
            ..ArchiveReport::default()
        };
        let mut seen = HashSet::new();
        let entries: Vec<PlannedEntry> = entries
            .into_iter()
            .filter(|entry| {
                let first = seen.insert(entry.name.clone());
                if !first {
                    tracing::warn!(entry = %entry.name, "skipping duplicate entry");
                    report.duplicates_skipped += 1;
                }
                first
            })
            .collect();
        let total = entries.len();

        for (idx, entry) in entries.into_iter().enumerate() {
            let label = PathBuf::from(&entry.name);
            self.progress.on_entry_start(&label, total, idx + 1);

            let header = EntryHeader {
                name: entry.name,
                size: entry.size,
                mode: entry.mode,
            };
            let read = match &entry.source {
                EntrySource::Bytes(content) => {
                    let mut reader = ProgressReader::new(content.as_slice(), self.progress.as_mut());
                    sink.append(&header, &mut reader)?;
                    reader.total()
                }
                EntrySource::File(path) => {
                    let file = File::open(path).map_err(|e| ArchiveError::filesystem(path, e))?;
                    let mut reader =
                        ProgressReader::new(file.take(header.size), self.progress.as_mut());
                    sink.append(&header, &mut reader)?;
                    let read = reader.total();
                    if read != header.size {
                        return Err(ArchiveError::filesystem(
                            path,
                            std::io::Error::new(
                                std::io::ErrorKind::UnexpectedEof,
                                format!("file shrank while archiving ({read} of {} bytes)", header.size),
                            ),
                        ));
                    }
                    read
                }
            };

            tracing::debug!(entry = %header.name, bytes = read, "added entry");
            report.bytes_read += read;
            report.entries.push(header.name);
            self.progress.on_entry_complete(&label);
        }

        sink.finish()?;

        let digest = digest_file(&output)?;
        report.output_size = digest.size;
        report.output_sha256 = digest.sha256;
        report.duration = started.elapsed();

        self.progress.on_complete();
        tracing::info!(
            output = %output.display(),
            format = S::TAG,
            entries = report.entries.len(),
            size = report.output_size,
            "archive written"
        );

        Ok(report)
    }

    fn run(
        &mut self,
        plan: impl FnOnce(&Self) -> Result<Vec<PlannedEntry>>,
    ) -> Result<ArchiveReport> {
        let started = self.begin()?;
        let result = plan(self).and_then(|entries| self.write(entries, started));
        if let Err(err) = &result {
            tracing::warn!(
                output = %self.output.display(),
                error = %err,
                "archiving failed; output is incomplete"
            );
        }
        result
    }
}

impl<S: EntrySink> Archiver for FileArchiver<S> {
    fn output_path(&self) -> &Path {
        &self.output
    }

    fn format(&self) -> &'static str {
        S::TAG
    }

    fn is_finished(&self) -> bool {
        self.state == ArchiverState::Finished
    }

    fn set_progress(&mut self, progress: Box<dyn ProgressCallback>) {
        self.progress = progress;
    }

    fn archive_content(&mut self, content: &[u8], entry_name: &str) -> Result<ArchiveReport> {
        self.run(|_| Self::content_entries(content, entry_name))
    }

    fn archive_file(&mut self, path: &Path) -> Result<ArchiveReport> {
        self.run(|archiver| archiver.file_entries(path))
    }

    fn archive_dir(
        &mut self,
        path: &Path,
        inclusions: &[PathBuf],
        exclusions: &[PathBuf],
    ) -> Result<ArchiveReport> {
        self.run(|archiver| archiver.dir_entries(path, inclusions, exclusions))
    }
}

/// An entry resolved and ready to write.
struct PlannedEntry {
    name: String,
    source: EntrySource,
    size: u64,
    mode: Option<u32>,
}

enum EntrySource {
    Bytes(Vec<u8>),
    File(PathBuf),
}
