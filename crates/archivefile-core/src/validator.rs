//! Path validation against a base directory.
//!
//! Every path handed to an archiver passes through a [`PathValidator`] before
//! any archive work starts. Relative inputs are resolved against the
//! validator's base, which is the process working directory read at call
//! time unless an explicit base was supplied.

use crate::ArchiveError;
use crate::Result;
use crate::error::ExpectedKind;
use crate::error::PathKind;
use std::env;
use std::fs::Metadata;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A path that exists and has been checked against the expected kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
    relative: PathBuf,
    kind: PathKind,
}

impl ValidatedPath {
    /// Absolute, lexically normalized path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the validator's base directory.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Kind of object found at the path.
    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// Consumes the value, returning the absolute path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Checks that paths exist and are of the expected kind.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::PathValidator;
///
/// let validator = PathValidator::current_dir();
/// let file = validator.validate_file("Cargo.toml")?;
/// assert_eq!(file.relative().to_str(), Some("Cargo.toml"));
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathValidator {
    base: Option<PathBuf>,
}

impl PathValidator {
    /// Validator anchored to the process working directory at call time.
    #[must_use]
    pub fn current_dir() -> Self {
        Self { base: None }
    }

    /// Validator anchored to a fixed base directory.
    ///
    /// A relative base is itself resolved against the working directory
    /// whenever it is used.
    #[must_use]
    pub fn with_base<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Returns the absolute base directory used for resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::WorkingDirectory`] if the working directory
    /// cannot be read.
    pub fn base(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) if base.is_absolute() => Ok(normalize(base)),
            Some(base) => Ok(normalize(&working_dir()?.join(base))),
            None => Ok(normalize(&working_dir()?)),
        }
    }

    /// Resolves `path` against the base without touching the filesystem.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        Ok(normalize(&self.base()?.join(path.as_ref())))
    }

    /// Succeeds only if `path` exists and is a regular file.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NotFound`] if nothing exists at `path`
    /// - [`ArchiveError::WrongKind`] if `path` is not a regular file
    /// - [`ArchiveError::Filesystem`] for any other stat failure
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidatedPath> {
        self.validate(path.as_ref(), ExpectedKind::File)
    }

    /// Succeeds only if `path` exists and is a directory.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NotFound`] if nothing exists at `path`
    /// - [`ArchiveError::WrongKind`] if `path` is not a directory
    /// - [`ArchiveError::Filesystem`] for any other stat failure
    pub fn validate_directory<P: AsRef<Path>>(&self, path: P) -> Result<ValidatedPath> {
        self.validate(path.as_ref(), ExpectedKind::Directory)
    }

    /// Succeeds if `path` exists as any kind, returning it relative to the
    /// base directory.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NotFound`] if nothing exists at `path`
    /// - [`ArchiveError::WorkingDirectory`] if the base cannot be resolved
    /// - [`ArchiveError::Relativize`] if no relative form exists
    pub fn validate_and_relativize<P: AsRef<Path>>(&self, path: P) -> Result<ValidatedPath> {
        self.validate(path.as_ref(), ExpectedKind::Any)
    }

    fn validate(&self, path: &Path, expected: ExpectedKind) -> Result<ValidatedPath> {
        let base = self.base()?;
        let resolved = normalize(&base.join(path));

        let metadata = std::fs::metadata(&resolved).map_err(|e| stat_error(path, expected, e))?;
        let kind = kind_of(&metadata);

        let matches = match expected {
            ExpectedKind::File => kind == PathKind::File,
            ExpectedKind::Directory => kind == PathKind::Directory,
            ExpectedKind::Any => true,
        };
        if !matches {
            return Err(ArchiveError::WrongKind {
                path: path.to_path_buf(),
                expected,
                found: kind,
            });
        }

        let relative = relative_to(&resolved, &base).ok_or_else(|| ArchiveError::Relativize {
            path: path.to_path_buf(),
            base: base.clone(),
        })?;

        Ok(ValidatedPath {
            path: resolved,
            relative,
            kind,
        })
    }
}

fn working_dir() -> Result<PathBuf> {
    env::current_dir().map_err(ArchiveError::WorkingDirectory)
}

fn stat_error(path: &Path, expected: ExpectedKind, err: io::Error) -> ArchiveError {
    if err.kind() == io::ErrorKind::NotFound {
        ArchiveError::NotFound {
            path: path.to_path_buf(),
            expected,
        }
    } else {
        ArchiveError::filesystem(path, err)
    }
}

fn kind_of(metadata: &Metadata) -> PathKind {
    if metadata.is_file() {
        PathKind::File
    } else if metadata.is_dir() {
        PathKind::Directory
    } else {
        PathKind::Other
    }
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// the preceding normal component where one exists.
///
/// # Examples
///
/// ```
/// use archivefile_core::validator::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("a/./b/../c")), Path::new("a/c"));
/// assert_eq!(normalize(Path::new("../a")), Path::new("../a"));
/// assert_eq!(normalize(Path::new("/..")), Path::new("/"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expresses `path` relative to `base`.
///
/// Both inputs should be absolute and normalized. Returns `None` when the
/// two paths share no root (for example different drive prefixes).
///
/// # Examples
///
/// ```
/// use archivefile_core::validator::relative_to;
/// use std::path::Path;
///
/// let rel = relative_to(Path::new("/work/src/a.txt"), Path::new("/work"));
/// assert_eq!(rel.as_deref(), Some(Path::new("src/a.txt")));
///
/// let rel = relative_to(Path::new("/tmp/out"), Path::new("/work/app"));
/// assert_eq!(rel.as_deref(), Some(Path::new("../../tmp/out")));
///
/// let rel = relative_to(Path::new("/work"), Path::new("/work"));
/// assert_eq!(rel.as_deref(), Some(Path::new(".")));
/// ```
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path_components: Vec<Component<'_>> = path.components().collect();
    let base_components: Vec<Component<'_>> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for component in &base_components[common..] {
        match component {
            Component::Normal(_) => relative.push(".."),
            _ => return None,
        }
    }
    for component in &path_components[common..] {
        match component {
            Component::Normal(name) => relative.push(name),
            Component::ParentDir => relative.push(".."),
            _ => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}
