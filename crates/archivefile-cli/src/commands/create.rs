//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use archivefile_core::ArchiveConfig;
use archivefile_core::ArchiveRequest;
use archivefile_core::ArchiveService;
use archivefile_core::ArchiverRegistry;
use archivefile_core::config::EntryRoot;
use archivefile_core::config::MatchMode;
use archivefile_core::request::RawArchiveRequest;
use std::fs;

pub fn execute(args: &CreateArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let request = build_request(args)?;

    if request.output_path.exists() {
        if !args.force {
            bail!(
                "Output file '{}' already exists\n\
                 HINT: Use --force to overwrite.",
                request.output_path.display()
            );
        }
        formatter.format_warning(&format!(
            "overwriting existing file '{}'",
            request.output_path.display()
        ));
    }

    let service = ArchiveService::new(ArchiverRegistry::builtin()).with_config(build_config(args));

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let result = if show_progress && CliProgress::should_show() {
        service.execute_with_progress(&request, Box::new(CliProgress::new("Archiving")))
    } else {
        service.execute(&request)
    };
    let report = add_archive_context(result, &request.output_path)?;

    if report.duplicates_skipped > 0 {
        formatter.format_warning(&format!(
            "{} duplicate entries were skipped",
            report.duplicates_skipped
        ));
    }

    formatter.format_creation_result(&report)
}

/// Builds the request from `--config` or from the source flags. Both go
/// through the same raw record so they are checked identically.
fn build_request(args: &CreateArgs) -> Result<ArchiveRequest> {
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read request file '{}'", path.display()))?;
        let raw: RawArchiveRequest = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse request file '{}'", path.display()))?;
        return add_archive_context(ArchiveRequest::try_from(raw), path);
    }

    let raw = RawArchiveRequest {
        format: args.format.clone(),
        output_path: args.output.clone().unwrap_or_default(),
        source_content: args.source_content.clone(),
        source_content_filename: args.source_content_filename.clone(),
        source_file: args.source_file.clone(),
        source_dir: args.source_dir.clone(),
        includes: args.includes.clone(),
        excludes: args.excludes.clone(),
    };
    let output = raw.output_path.clone();
    add_archive_context(ArchiveRequest::try_from(raw), &output)
}

fn build_config(args: &CreateArgs) -> ArchiveConfig {
    let mut config = ArchiveConfig::default()
        .with_preserve_permissions(!args.no_permissions)
        .with_follow_symlinks(args.follow_symlinks)
        .with_match_mode(if args.prefix_excludes {
            MatchMode::Prefix
        } else {
            MatchMode::Exact
        })
        .with_entry_root(if args.relative_to_source {
            EntryRoot::SourceDirectory
        } else {
            EntryRoot::WorkingDirectory
        });

    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }
    config
}
