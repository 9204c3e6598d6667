//! Container formats that archive entries are written into.
//!
//! Each format implements [`EntrySink`]; the generic
//! [`FileArchiver`](crate::archiver::FileArchiver) drives any sink through
//! the three archiving operations.

pub mod tar;
pub mod zip;

use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::Result;
use std::fs::File;
use std::io::Read;
use std::path::Component;
use std::path::Path;

pub use self::tar::TarGzSink;
pub use self::zip::ZipSink;

/// Modification time stamped on every entry: 1980-01-01T00:00:00Z, the
/// earliest time a zip header can represent.
pub const FIXED_MTIME_UNIX: u64 = 315_532_800;

/// Metadata for a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// `/`-separated relative name inside the archive.
    pub name: String,
    /// Exact content length in bytes.
    pub size: u64,
    /// Unix permission bits, when known and preserved.
    pub mode: Option<u32>,
}

/// A writable archive container bound to an open output file.
pub trait EntrySink: Sized + Send {
    /// Registry tag for this format.
    const TAG: &'static str;

    /// Starts a new, empty container writing to `file`.
    fn create(file: File, config: &ArchiveConfig) -> Result<Self>;

    /// Appends one entry whose content is read from `data`.
    ///
    /// `data` must yield exactly `header.size` bytes.
    fn append(&mut self, header: &EntryHeader, data: &mut dyn Read) -> Result<()>;

    /// Writes trailing structures and flushes the output file.
    fn finish(self) -> Result<()>;
}

/// Converts a relative path into an archive entry name.
///
/// Separators become `/` and `.` components are dropped. Empty, absolute,
/// non-UTF-8 and parent-escaping paths are rejected.
///
/// # Examples
///
/// ```
/// use archivefile_core::formats::entry_name;
/// use std::path::Path;
///
/// assert_eq!(entry_name(Path::new("./sub/b.txt")).unwrap(), "sub/b.txt");
/// assert!(entry_name(Path::new("../b.txt")).is_err());
/// assert!(entry_name(Path::new("/etc/passwd")).is_err());
/// ```
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidEntryName`] for unusable names.
pub fn entry_name(path: &Path) -> Result<String> {
    let invalid = |reason| ArchiveError::InvalidEntryName {
        name: path.to_string_lossy().into_owned(),
        reason,
    };

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                parts.push(part.to_str().ok_or_else(|| invalid("not valid UTF-8"))?);
            }
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("escapes the archive root")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("is absolute")),
        }
    }

    if parts.is_empty() {
        return Err(invalid("is empty"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_plain() {
        assert_eq!(entry_name(Path::new("greeting.txt")).unwrap(), "greeting.txt");
        assert_eq!(entry_name(Path::new("a/b/c.txt")).unwrap(), "a/b/c.txt");
    }

    #[test]
    fn test_entry_name_rejections() {
        for (input, reason) in [
            ("", "is empty"),
            (".", "is empty"),
            ("../x", "escapes the archive root"),
            ("a/../../x", "escapes the archive root"),
            ("/abs", "is absolute"),
        ] {
            match entry_name(Path::new(input)) {
                Err(ArchiveError::InvalidEntryName { reason: got, .. }) => {
                    assert_eq!(got, reason, "input {input:?}");
                }
                other => panic!("expected rejection for {input:?}, got {other:?}"),
            }
        }
    }
}
