//! Directory traversal for archive sources.

use crate::ArchiveError;
use crate::Result;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Collects every non-directory path under `root`, sorted by file name at
/// each level so archives are reproducible.
///
/// Symlinks to directories are skipped unless `follow_symlinks` is set, in
/// which case their contents are walked. Symlinks to files and dangling
/// symlinks are returned as-is; the later validation step decides what to
/// do with them.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::walker::collect_files;
/// use std::path::Path;
///
/// let files = collect_files(Path::new("src"), false)?;
/// println!("{} files", files.len());
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_files(root: &Path, follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            ArchiveError::filesystem(path, source)
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        if entry.path_is_symlink()
            && !follow_symlinks
            && fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
        {
            tracing::debug!(path = %entry.path().display(), "skipping symlinked directory");
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_sorted_and_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();
        fs::write(root.join("sub/deeper/d.txt"), "d").unwrap();

        let files = collect_files(root, false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub/c.txt"),
                PathBuf::from("sub/deeper/d.txt"),
            ]
        );
    }

    #[test]
    fn test_collect_files_empty_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();
        assert!(collect_files(temp.path(), false).unwrap().is_empty());
    }

    #[test]
    fn test_collect_files_includes_hidden() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "X=1").unwrap();
        assert_eq!(collect_files(temp.path(), false).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_symlinked_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let outside = temp.path().join("outside");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("x.txt"), "x").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        assert!(collect_files(&root, false).unwrap().is_empty());

        let followed = collect_files(&root, true).unwrap();
        assert_eq!(followed, vec![root.join("linked").join("x.txt")]);
    }
}
