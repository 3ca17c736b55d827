//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the merged packages and diagnostics
//! - Per-extension load status

use crate::domain::{ConflictKind, ConflictReport, MergeNote};
use crate::manifest::{ExtensionLoad, ExtensionOutcome, ExtensionsScan};
use crate::merge::AggregateEntry;
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::writer::WriteStatus;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Platform identifier
    platform: String,
    /// Core requirements file
    core_file: String,
    /// Output file
    output: String,
    /// What happened to the output file
    status: WriteStatus,
    /// Summary statistics
    summary: JsonSummary,
    /// Merged packages in output order
    packages: Vec<JsonPackage>,
    /// Passthrough lines appended after the packages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra_index_lines: Vec<String>,
    /// Rejected updates
    conflicts: Vec<JsonConflict>,
    /// Dropped opaque constraints
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<JsonNote>,
    /// Extension load records (failures always, all in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extensions: Vec<JsonExtension>,
    /// Extensions directory problem, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions_warning: Option<String>,
    /// Rendered file content
    content: String,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Number of merged packages
    packages: usize,
    /// Number of conflicts
    conflicts: usize,
    /// Number of extensions skipped because of errors
    skipped_extensions: usize,
}

/// JSON representation of a merged package
#[derive(Serialize)]
struct JsonPackage {
    /// Package name as first declared
    name: String,
    /// Formatted constraint; absent when unconstrained
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<String>,
    /// Whether the constraint is an unparsed literal
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    opaque: bool,
    /// Declaring sources
    sources: Vec<String>,
}

/// JSON representation of a conflict
#[derive(Serialize)]
struct JsonConflict {
    package: String,
    existing: Option<String>,
    existing_sources: Vec<String>,
    incoming: String,
    incoming_source: String,
    kind: ConflictKind,
    message: String,
}

/// JSON representation of a note
#[derive(Serialize)]
struct JsonNote {
    package: String,
    dropped: String,
    dropped_source: String,
    kept: String,
}

/// JSON representation of an extension load record
#[derive(Serialize)]
struct JsonExtension {
    name: String,
    manifest: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    declarations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<&AggregateEntry> for JsonPackage {
    fn from(entry: &AggregateEntry) -> Self {
        Self {
            name: entry.name.clone(),
            constraint: entry.constraint.as_ref().map(|c| c.to_string()),
            opaque: entry.constraint.as_ref().is_some_and(|c| c.is_opaque()),
            sources: entry.sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<&ConflictReport> for JsonConflict {
    fn from(conflict: &ConflictReport) -> Self {
        Self {
            package: conflict.package.clone(),
            existing: conflict.existing.as_ref().map(|c| c.to_string()),
            existing_sources: conflict
                .existing_sources
                .iter()
                .map(|s| s.to_string())
                .collect(),
            incoming: conflict.incoming.to_string(),
            incoming_source: conflict.incoming_source.to_string(),
            kind: conflict.kind,
            message: conflict.to_string(),
        }
    }
}

impl From<&MergeNote> for JsonNote {
    fn from(note: &MergeNote) -> Self {
        Self {
            package: note.package.clone(),
            dropped: note.dropped.clone(),
            dropped_source: note.dropped_source.to_string(),
            kept: note.kept.to_string(),
        }
    }
}

impl From<&ExtensionLoad> for JsonExtension {
    fn from(load: &ExtensionLoad) -> Self {
        let (status, declarations, reason) = match load.outcome {
            ExtensionOutcome::Loaded { declarations } => ("loaded", Some(declarations), None),
            ExtensionOutcome::MissingManifest => ("missing_manifest", None, None),
            ExtensionOutcome::Failed { ref reason } => ("failed", None, Some(reason.clone())),
        };
        Self {
            name: load.name.clone(),
            manifest: load.manifest_path.display().to_string(),
            status,
            declarations,
            reason,
        }
    }
}

impl JsonFormatter {
    fn summary(result: &OrchestratorResult) -> JsonSummary {
        JsonSummary {
            packages: result.outcome.aggregate.len(),
            conflicts: result.outcome.conflicts.len(),
            skipped_extensions: result.sources.failed_extensions().count(),
        }
    }

    fn to_json(&self, result: &OrchestratorResult) -> JsonOutput {
        let extensions = result
            .sources
            .extensions
            .iter()
            .filter(|e| self.verbosity == Verbosity::Verbose || e.is_failure())
            .map(JsonExtension::from)
            .collect();

        let extensions_warning = match result.sources.scan {
            ExtensionsScan::Scanned => None,
            ExtensionsScan::DirectoryMissing => Some(format!(
                "extensions directory not found: {}",
                result.config.extensions_dir.display()
            )),
            ExtensionsScan::DirectoryUnreadable { ref reason } => Some(reason.clone()),
        };

        JsonOutput {
            platform: result.config.platform.to_string(),
            core_file: result.config.core_file.display().to_string(),
            output: result.write.path.display().to_string(),
            status: result.write.status,
            summary: Self::summary(result),
            packages: result.outcome.aggregate.iter().map(JsonPackage::from).collect(),
            extra_index_lines: result.sources.extra_index_lines.clone(),
            conflicts: result.outcome.conflicts.iter().map(JsonConflict::from).collect(),
            notes: result.outcome.notes.iter().map(JsonNote::from).collect(),
            extensions,
            extensions_warning,
            content: result.rendered.clone(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json(result);

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = Self::summary(result);

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
