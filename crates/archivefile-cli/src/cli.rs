//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archivefile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new archive from content, a file or a directory
    Create(CreateArgs),
    /// List supported archive formats
    Formats,
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .args(["source_content", "source_file", "source_dir", "config"])
        .required(true)
))]
pub struct CreateArgs {
    /// Output archive file path
    #[arg(short, long, value_name = "PATH", required_unless_present = "config")]
    pub output: Option<PathBuf>,

    /// Archive format
    #[arg(short = 't', long = "type", value_name = "FORMAT", default_value = "zip")]
    pub format: String,

    /// Literal content of a single-entry archive
    #[arg(long, value_name = "TEXT", requires = "source_content_filename")]
    pub source_content: Option<String>,

    /// Entry name for --source-content
    #[arg(long, value_name = "NAME", requires = "source_content")]
    pub source_content_filename: Option<String>,

    /// Single file to archive
    #[arg(long, value_name = "PATH")]
    pub source_file: Option<PathBuf>,

    /// Directory to archive
    #[arg(long, value_name = "PATH")]
    pub source_dir: Option<PathBuf>,

    /// Path under --source-dir to include (can be repeated)
    #[arg(long = "include", value_name = "PATH", requires = "source_dir")]
    pub includes: Vec<PathBuf>,

    /// Path to leave out (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATH", requires = "source_dir")]
    pub excludes: Vec<PathBuf>,

    /// Read the request from a JSON file instead of flags
    #[arg(long, value_name = "FILE", conflicts_with_all = ["output", "format", "includes", "excludes"])]
    pub config: Option<PathBuf>,

    /// Compression level (0 stores entries uncompressed)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Also exclude everything under an excluded directory
    #[arg(long)]
    pub prefix_excludes: bool,

    /// Name entries relative to the source directory instead of the working
    /// directory
    #[arg(long)]
    pub relative_to_source: bool,

    /// Follow symbolic links to directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not record file permissions
    #[arg(long)]
    pub no_permissions: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("archivefile").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_dir_flags() {
        let cli = parse(&[
            "create", "-o", "out.zip", "--source-dir", "app", "-x", "app/a", "--exclude", "app/b",
        ])
        .unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.format, "zip");
        assert_eq!(args.excludes.len(), 2);
        assert_eq!(args.source_dir, Some(PathBuf::from("app")));
    }

    #[test]
    fn test_create_requires_a_source() {
        assert!(parse(&["create", "-o", "out.zip"]).is_err());
    }

    #[test]
    fn test_sources_are_exclusive() {
        assert!(parse(&["create", "-o", "o.zip", "--source-file", "a", "--source-dir", "b"]).is_err());
    }

    #[test]
    fn test_content_requires_filename() {
        assert!(parse(&["create", "-o", "o.zip", "--source-content", "hi"]).is_err());
    }

    #[test]
    fn test_excludes_require_source_dir() {
        assert!(parse(&["create", "-o", "o.zip", "--source-file", "a", "-x", "b"]).is_err());
    }

    #[test]
    fn test_compression_level_range() {
        assert!(parse(&["create", "-o", "o.zip", "--source-file", "a", "-l", "0"]).is_ok());
        assert!(parse(&["create", "-o", "o.zip", "--source-file", "a", "-l", "10"]).is_err());
    }

    #[test]
    fn test_config_replaces_output() {
        assert!(parse(&["create", "--config", "req.json"]).is_ok());
        assert!(parse(&["create", "--config", "req.json", "-o", "o.zip"]).is_err());
    }
}
