//! Formats command implementation.

use crate::output::OutputFormatter;
use anyhow::Result;
use archivefile_core::ArchiverRegistry;

pub fn execute(formatter: &dyn OutputFormatter) -> Result<()> {
    let registry = ArchiverRegistry::builtin();
    let formats: Vec<&str> = registry.formats().collect();
    formatter.format_formats(&formats)
}
