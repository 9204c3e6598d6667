//! Output checksums.

use crate::ArchiveError;
use crate::Result;
use sha2::Digest;
use sha2::Sha256;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Size and SHA-256 of a finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// File size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256.
    pub sha256: String,
}

/// Streams a file through SHA-256.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::digest::digest_file;
/// use std::path::Path;
///
/// let digest = digest_file(Path::new("lambda.zip"))?;
/// println!("{} bytes, sha256 {}", digest.size, digest.sha256);
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns [`ArchiveError::Filesystem`] if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let mut file = File::open(path).map_err(|e| ArchiveError::filesystem(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    let mut size = 0u64;

    loop {
        let n = file
            .read(&mut buffer)
            .map_err(|e| ArchiveError::filesystem(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok(FileDigest {
        size,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_digest_known_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hello");
        std::fs::write(&path, "hello").unwrap();

        let digest = digest_file(&path).unwrap();
        assert_eq!(digest.size, 5);
        assert_eq!(
            digest.sha256,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_digest_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = digest_file(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, ArchiveError::Filesystem { .. }));
    }
}
