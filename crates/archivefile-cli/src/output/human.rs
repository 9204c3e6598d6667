//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use archivefile_core::ArchiveReport;
use console::Term;
use console::style;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, report: &ArchiveReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                report.output_path.display()
            ));
        } else {
            self.line(&format!("Archive created: {}", report.output_path.display()));
        }

        self.line("");
        self.line(&format!("  Format:           {}", report.format));
        self.line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added())
        ));
        self.line(&format!(
            "  Total size:       {}",
            humanize_bytes(report.bytes_read)
        ));
        self.line(&format!(
            "  Archive size:     {}",
            humanize_bytes(report.output_size)
        ));
        if report.bytes_read > 0 {
            self.line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }
        self.line(&format!("  SHA-256:          {}", report.output_sha256));

        if report.duplicates_skipped > 0 {
            self.line(&format!(
                "  Duplicates:       {} skipped",
                report.duplicates_skipped
            ));
        }

        if self.verbose {
            self.line(&format!("  Duration:         {:?}", report.duration));
            self.line("");
            self.line("Entries:");
            for entry in &report.entries {
                self.line(&format!("  {entry}"));
            }
        }

        Ok(())
    }

    fn format_formats(&self, formats: &[&str]) -> Result<()> {
        for format in formats {
            self.line(format);
        }
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_small() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(42), "42");
        assert_eq!(HumanFormatter::format_number(999), "999");
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
        assert_eq!(
            HumanFormatter::format_number(123_456_789_012),
            "123,456,789,012"
        );
    }
}
