//! Lookup table from format tag to archiver constructor.

use crate::ArchiveConfig;
use crate::Archiver;
use crate::PathValidator;
use crate::TarGzArchiver;
use crate::ZipArchiver;
use crate::formats::EntrySink;
use crate::formats::TarGzSink;
use crate::formats::ZipSink;
use std::collections::BTreeMap;
use std::path::Path;

/// Builds an archiver bound to `output`.
pub type ArchiverConstructor = fn(&Path, ArchiveConfig, PathValidator) -> Box<dyn Archiver>;

/// Immutable table of supported archive formats.
///
/// Tags are matched exactly. The table is owned by whoever builds it; there
/// is no process-wide registry.
///
/// # Examples
///
/// ```
/// use archivefile_core::ArchiverRegistry;
/// use std::path::Path;
///
/// let registry = ArchiverRegistry::builtin();
/// assert!(registry.get("zip", Path::new("out.zip")).is_some());
/// assert!(registry.get("rar", Path::new("out.rar")).is_none());
/// ```
#[derive(Clone)]
pub struct ArchiverRegistry {
    constructors: BTreeMap<&'static str, ArchiverConstructor>,
}

impl ArchiverRegistry {
    /// Registry holding `zip` and `tar.gz`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty()
            .with_format(ZipSink::TAG, zip_archiver)
            .with_format(TarGzSink::TAG, tar_gz_archiver)
    }

    /// Registry with no formats.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Adds or replaces the constructor for `tag`.
    #[must_use]
    pub fn with_format(mut self, tag: &'static str, constructor: ArchiverConstructor) -> Self {
        self.constructors.insert(tag, constructor);
        self
    }

    /// Returns `true` if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Archiver for `tag` with default configuration, anchored to the
    /// working directory. `None` for unknown tags.
    pub fn get(&self, tag: &str, output: &Path) -> Option<Box<dyn Archiver>> {
        self.get_with(
            tag,
            output,
            ArchiveConfig::default(),
            PathValidator::current_dir(),
        )
    }

    /// Archiver for `tag` with explicit configuration and validator.
    pub fn get_with(
        &self,
        tag: &str,
        output: &Path,
        config: ArchiveConfig,
        validator: PathValidator,
    ) -> Option<Box<dyn Archiver>> {
        let constructor = self.constructors.get(tag)?;
        Some(constructor(output, config, validator))
    }

    /// Registered tags in sorted order.
    pub fn formats(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}

impl Default for ArchiverRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ArchiverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiverRegistry")
            .field("formats", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn zip_archiver(output: &Path, config: ArchiveConfig, validator: PathValidator) -> Box<dyn Archiver> {
    Box::new(ZipArchiver::with_settings(output, config, validator))
}

fn tar_gz_archiver(
    output: &Path,
    config: ArchiveConfig,
    validator: PathValidator,
) -> Box<dyn Archiver> {
    Box::new(TarGzArchiver::with_settings(output, config, validator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let registry = ArchiverRegistry::default();
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["tar.gz", "zip"]);
        assert!(registry.contains("zip"));
        assert!(!registry.contains("ZIP"));
    }

    #[test]
    fn test_get_binds_output_and_format() {
        let registry = ArchiverRegistry::builtin();

        let archiver = registry.get("tar.gz", Path::new("dist/out.tgz"));
        assert!(archiver.is_some());
        if let Some(archiver) = archiver {
            assert_eq!(archiver.format(), "tar.gz");
            assert_eq!(archiver.output_path(), Path::new("dist/out.tgz"));
            assert!(!archiver.is_finished());
        }
    }

    #[test]
    fn test_unknown_tag_yields_none() {
        let registry = ArchiverRegistry::builtin();
        assert!(registry.get("rar", Path::new("out.rar")).is_none());
        assert!(registry.get("", Path::new("out")).is_none());
        assert!(ArchiverRegistry::empty().get("zip", Path::new("out.zip")).is_none());
    }

    #[test]
    fn test_with_format_registers_alias() {
        let registry = ArchiverRegistry::empty().with_format("jar", zip_archiver);
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["jar"]);

        let archiver = registry.get("jar", Path::new("app.jar"));
        assert_eq!(archiver.map(|a| a.format()), Some("zip"));
    }
}
