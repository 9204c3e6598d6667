//! Inclusion/exclusion resolution.
//!
//! The effective set of paths to archive is the inclusions minus the
//! exclusions, compared by normalized relative path.

use crate::PathValidator;
use crate::Result;
use crate::config::MatchMode;
use crate::validator::ValidatedPath;
use std::path::Path;

/// Resolves the inclusions that survive the exclusions.
///
/// Every inclusion and every exclusion is validated first; the first invalid
/// path aborts resolution. Inclusion order and duplicates are preserved.
///
/// # Examples
///
/// ```no_run
/// use archivefile_core::PathValidator;
/// use archivefile_core::config::MatchMode;
/// use archivefile_core::matching::resolve_matches;
///
/// let validator = PathValidator::current_dir();
/// let kept = resolve_matches(
///     &validator,
///     &["src/a.rs", "src/b.rs", "src/c.rs"],
///     &["src/b.rs"],
///     MatchMode::Exact,
/// )?;
/// assert_eq!(kept.len(), 2);
/// # Ok::<(), archivefile_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns the validation error of the first inclusion or exclusion that
/// does not exist or cannot be relativized.
pub fn resolve_matches<P: AsRef<Path>, Q: AsRef<Path>>(
    validator: &PathValidator,
    inclusions: &[P],
    exclusions: &[Q],
    mode: MatchMode,
) -> Result<Vec<ValidatedPath>> {
    let inclusions = inclusions
        .iter()
        .map(|path| validator.validate_and_relativize(path))
        .collect::<Result<Vec<_>>>()?;

    let exclusions = exclusions
        .iter()
        .map(|path| validator.validate_and_relativize(path))
        .collect::<Result<Vec<_>>>()?;

    Ok(subtract(inclusions, &exclusions, mode))
}

/// Removes already-validated exclusions from already-validated inclusions.
pub(crate) fn subtract(
    inclusions: Vec<ValidatedPath>,
    exclusions: &[ValidatedPath],
    mode: MatchMode,
) -> Vec<ValidatedPath> {
    inclusions
        .into_iter()
        .filter(|inclusion| {
            !exclusions
                .iter()
                .any(|exclusion| is_excluded(inclusion.relative(), exclusion.relative(), mode))
        })
        .collect()
}

fn is_excluded(candidate: &Path, exclusion: &Path, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => candidate == exclusion,
        // "." excludes everything under the base
        MatchMode::Prefix => exclusion == Path::new(".") || candidate.starts_with(exclusion),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathValidator) {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(temp.path().join(name), name).unwrap();
        }
        fs::create_dir(temp.path().join("dir")).unwrap();
        fs::write(temp.path().join("dir/inner"), "").unwrap();
        let validator = PathValidator::with_base(temp.path());
        (temp, validator)
    }

    fn relatives(paths: &[ValidatedPath]) -> Vec<PathBuf> {
        paths.iter().map(|p| p.relative().to_path_buf()).collect()
    }

    #[test]
    fn test_excludes_exact_match_preserving_order() {
        let (_temp, validator) = fixture();
        let kept = resolve_matches(&validator, &["a", "b", "c"], &["b"], MatchMode::Exact).unwrap();
        assert_eq!(relatives(&kept), vec![PathBuf::from("a"), PathBuf::from("c")]);
    }

    #[test]
    fn test_empty_inclusions() {
        let (_temp, validator) = fixture();
        let none: [&str; 0] = [];
        let kept = resolve_matches(&validator, &none, &["a"], MatchMode::Exact).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_normalized_comparison() {
        let (temp, validator) = fixture();
        let absolute_b = temp.path().join("b");
        let kept = resolve_matches(
            &validator,
            &[PathBuf::from("./a"), PathBuf::from("dir/../b")],
            &[absolute_b],
            MatchMode::Exact,
        )
        .unwrap();
        assert_eq!(relatives(&kept), vec![PathBuf::from("a")]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let (_temp, validator) = fixture();
        let kept = resolve_matches(&validator, &["a", "a", "c"], &["c"], MatchMode::Exact).unwrap();
        assert_eq!(relatives(&kept), vec![PathBuf::from("a"), PathBuf::from("a")]);
    }

    #[test]
    fn test_invalid_inclusion_fails_fast() {
        let (_temp, validator) = fixture();
        let err = resolve_matches(&validator, &["a", "missing"], &["b"], MatchMode::Exact)
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), Some(Path::new("missing")));
    }

    #[test]
    fn test_invalid_exclusion_fails() {
        let (_temp, validator) = fixture();
        let err = resolve_matches(&validator, &["a"], &["missing"], MatchMode::Exact).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_exact_mode_ignores_directory_exclusion() {
        let (_temp, validator) = fixture();
        let kept =
            resolve_matches(&validator, &["dir/inner", "a"], &["dir"], MatchMode::Exact).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_prefix_mode_excludes_directory_contents() {
        let (_temp, validator) = fixture();
        let kept =
            resolve_matches(&validator, &["dir/inner", "a"], &["dir"], MatchMode::Prefix).unwrap();
        assert_eq!(relatives(&kept), vec![PathBuf::from("a")]);
    }

    #[test]
    fn test_prefix_mode_is_component_wise() {
        let (temp, validator) = fixture();
        fs::write(temp.path().join("dir2"), "").unwrap();
        let kept = resolve_matches(&validator, &["dir2"], &["dir"], MatchMode::Prefix).unwrap();
        assert_eq!(relatives(&kept), vec![PathBuf::from("dir2")]);
    }
}
