//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Conflict, note and skipped-extension listings with colors
//! - Per-package detail in verbose mode
//! - The rendered file in dry-run mode
//! - A closing status line for the output file

use crate::manifest::{ExtensionOutcome, ExtensionsScan};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::writer::WriteStatus;
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: ColoredString) -> String {
        if self.color {
            text.to_string()
        } else {
            text.clear().to_string()
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self, result: &OrchestratorResult) -> String {
        if result.write.status == WriteStatus::Skipped {
            format!("{} ", self.paint("(dry-run)".cyan()))
        } else {
            String::new()
        }
    }

    fn format_header(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let loaded = result
            .sources
            .extensions
            .iter()
            .filter(|e| matches!(e.outcome, ExtensionOutcome::Loaded { .. }))
            .count();

        writeln!(
            writer,
            "{}{} package(s) from {} and {} extension(s) [{}]",
            self.dry_run_prefix(result),
            self.paint(result.outcome.aggregate.len().to_string().bold()),
            result.config.core_file.display(),
            loaded,
            result.config.platform.display_name()
        )?;

        match result.sources.scan {
            ExtensionsScan::Scanned => {}
            ExtensionsScan::DirectoryMissing => writeln!(
                writer,
                "  {}",
                self.paint(
                    format!(
                        "no extensions directory at {}",
                        result.config.extensions_dir.display()
                    )
                    .yellow()
                )
            )?,
            ExtensionsScan::DirectoryUnreadable { ref reason } => writeln!(
                writer,
                "  {}",
                self.paint(format!("extensions not scanned: {}", reason).yellow())
            )?,
        }

        Ok(())
    }

    fn format_packages(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let aggregate = &result.outcome.aggregate;
        if aggregate.is_empty() {
            return Ok(());
        }

        let width = aggregate.iter().map(|e| e.name.len()).max().unwrap_or(0).max(20);
        writeln!(writer)?;
        for entry in aggregate {
            let constraint = entry
                .constraint
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "*".to_string());
            let sources: Vec<String> = entry.sources.iter().map(|s| s.to_string()).collect();
            writeln!(
                writer,
                "  {:width$} {} {}",
                entry.name,
                self.paint(constraint.bright_white()),
                self.paint(format!("({})", sources.join(", ")).dimmed()),
                width = width
            )?;
        }

        Ok(())
    }

    fn format_conflicts(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let conflicts = &result.outcome.conflicts;
        if conflicts.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "{}",
            self.paint(format!("Conflicts ({}):", conflicts.len()).red().bold())
        )?;
        for conflict in conflicts {
            writeln!(writer, "  {}", self.paint(conflict.to_string().red()))?;
        }

        Ok(())
    }

    fn format_notes(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let notes = &result.outcome.notes;
        if notes.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.paint("Notes:".dimmed()))?;
        for note in notes {
            writeln!(writer, "  {}", self.paint(note.to_string().dimmed()))?;
        }

        Ok(())
    }

    fn format_extensions(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verbose = self.verbosity == Verbosity::Verbose;
        let shown: Vec<_> = result
            .sources
            .extensions
            .iter()
            .filter(|e| verbose || e.is_failure())
            .collect();
        if shown.is_empty() {
            return Ok(());
        }

        writeln!(writer)?;
        let title = if verbose { "Extensions:" } else { "Skipped extensions:" };
        writeln!(writer, "{}", self.paint(title.yellow()))?;
        for extension in shown {
            let detail = extension.outcome.to_string();
            let detail = if extension.is_failure() {
                self.paint(detail.yellow())
            } else {
                self.paint(detail.dimmed())
            };
            writeln!(writer, "  {}: {}", extension.name, detail)?;
        }

        Ok(())
    }

    fn format_rendered(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer)?;
        write!(writer, "{}", result.rendered)?;
        Ok(())
    }

    fn format_status(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let path = result.write.path.display();
        let line = match result.write.status {
            WriteStatus::Written => self.paint(format!("✓ Wrote {}", path).green()),
            WriteStatus::Unchanged => self.paint(format!("{} is unchanged", path).dimmed()),
            WriteStatus::Skipped => format!(
                "{}Would write {}",
                self.dry_run_prefix(result),
                self.paint(path.to_string().bold())
            ),
            WriteStatus::UpToDate => self.paint(format!("✓ {} is up to date", path).green()),
            WriteStatus::Stale => self.paint(format!("✗ {} is out of date", path).red().bold()),
        };
        writeln!(writer, "{}", line)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let dry_run = result.write.status == WriteStatus::Skipped;

        if self.verbosity == Verbosity::Quiet {
            if dry_run {
                write!(writer, "{}", result.rendered)?;
            } else if result.is_stale() {
                self.format_status(result, writer)?;
            }
            return Ok(());
        }

        self.format_header(result, writer)?;
        if self.verbosity == Verbosity::Verbose {
            self.format_packages(result, writer)?;
        }
        self.format_conflicts(result, writer)?;
        self.format_notes(result, writer)?;
        self.format_extensions(result, writer)?;
        if dry_run {
            self.format_rendered(result, writer)?;
        }

        writeln!(writer)?;
        self.format_summary(result, writer)?;
        self.format_status(result, writer)
    }

    fn format_summary(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let packages = result.outcome.aggregate.len();
        let conflicts = result.outcome.conflicts.len();
        let skipped = result.sources.failed_extensions().count();

        let conflicts_display = if conflicts > 0 {
            self.paint(conflicts.to_string().red().bold())
        } else {
            self.paint(conflicts.to_string().green())
        };
        let skipped_display = if skipped > 0 {
            self.paint(skipped.to_string().yellow())
        } else {
            skipped.to_string()
        };

        writeln!(
            writer,
            "Summary: {} package(s), {} conflict(s), {} skipped extension(s)",
            packages, conflicts_display, skipped_display
        )
    }
}
