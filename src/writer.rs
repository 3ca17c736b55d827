//! Rendering and writing the merged requirements file
//!
//! This module provides:
//! - Canonical rendering of the aggregate plus passthrough lines
//! - RequirementsWriter supporting write, dry-run and check modes

use crate::error::OutputError;
use crate::merge::DependencyAggregate;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Render the merged requirements file content
///
/// Dependency lines come first, sorted by normalized package name, followed by
/// the passthrough lines in their original order. Lines are joined with `\n`
/// and terminated by a trailing newline; nothing to write renders as an empty
/// string.
pub fn render<S: AsRef<str>>(aggregate: &DependencyAggregate, extra_lines: &[S]) -> String {
    let lines: Vec<String> = aggregate
        .iter()
        .map(|entry| entry.requirement_line())
        .chain(extra_lines.iter().map(|line| line.as_ref().to_string()))
        .collect();

    if lines.is_empty() {
        return String::new();
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// What the writer does with the rendered content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write the output file
    Write,
    /// Render only
    DryRun,
    /// Compare against the existing output file without writing
    Check,
}

/// What happened to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    /// File written with new content
    Written,
    /// File already had the rendered content; not rewritten
    Unchanged,
    /// Dry run; nothing written
    Skipped,
    /// Check mode; file matches the rendered content
    UpToDate,
    /// Check mode; file is missing or differs
    Stale,
}

impl WriteStatus {
    /// Returns true if check mode found the output out of date
    pub fn is_stale(&self) -> bool {
        matches!(self, WriteStatus::Stale)
    }
}

/// Result of handing rendered content to the writer
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Output file path
    pub path: PathBuf,
    /// Outcome for the file
    pub status: WriteStatus,
    /// Content of the output file before this run, if it existed
    pub previous: Option<String>,
}

impl WriteResult {
    /// Returns true if the file on disk was modified
    pub fn file_modified(&self) -> bool {
        self.status == WriteStatus::Written
    }
}

/// Writer for the merged requirements file
pub struct RequirementsWriter {
    mode: WriteMode,
}

impl RequirementsWriter {
    /// Create a new RequirementsWriter
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    /// Apply the rendered content to the output path according to the mode
    ///
    /// Check mode ignores a missing final newline in the existing file, so a
    /// file written without one is still up to date. Write mode compares
    /// bytes and rewrites it.
    pub fn apply(&self, path: &Path, content: &str) -> Result<WriteResult, OutputError> {
        let previous = read_existing(path)?;
        let matches = previous.as_deref() == Some(content);

        let status = match self.mode {
            WriteMode::DryRun => WriteStatus::Skipped,
            WriteMode::Check if previous.as_deref().is_some_and(|p| same_lines(p, content)) => {
                WriteStatus::UpToDate
            }
            WriteMode::Check => WriteStatus::Stale,
            WriteMode::Write if matches => WriteStatus::Unchanged,
            WriteMode::Write => {
                write_output(path, content)?;
                WriteStatus::Written
            }
        };

        Ok(WriteResult {
            path: path.to_path_buf(),
            status,
            previous,
        })
    }
}

// Equal up to one trailing newline
fn same_lines(a: &str, b: &str) -> bool {
    a.strip_suffix('\n').unwrap_or(a) == b.strip_suffix('\n').unwrap_or(b)
}

/// Read the existing output file; a missing file is `None`
pub fn read_existing(path: &Path) -> Result<Option<String>, OutputError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(OutputError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write content to the output path, creating parent directories
pub fn write_output(path: &Path, content: &str) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::CreateDirError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, content).map_err(|e| OutputError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, SourceLabel, TaggedRequirement};
    use crate::merge::merge;
    use crate::parser::RequirementParser;
    use tempfile::TempDir;

    fn aggregate(lines: &[&str]) -> DependencyAggregate {
        let parser = RequirementParser::new();
        let source = SourceLabel::core(Platform::Linux, "requirements-linux.txt");
        merge(
            lines
                .iter()
                .map(|line| TaggedRequirement::new(source.clone(), parser.parse(line))),
        )
        .aggregate
    }

    #[test]
    fn test_render_sorted_with_trailing_newline() {
        let agg = aggregate(&["torch==2.0.0", "Pillow>=9.0", "numpy"]);
        let none: &[&str] = &[];
        assert_eq!(render(&agg, none), "numpy\nPillow>=9.0.0\ntorch==2.0.0\n");
    }

    #[test]
    fn test_render_extra_lines_last() {
        let agg = aggregate(&["torch==2.0.0"]);
        let extras = ["--extra-index-url https://download.pytorch.org/whl/cu118"];
        assert_eq!(
            render(&agg, &extras),
            "torch==2.0.0\n--extra-index-url https://download.pytorch.org/whl/cu118\n"
        );
    }

    #[test]
    fn test_render_empty() {
        let none: &[&str] = &[];
        assert_eq!(render(&DependencyAggregate::new(), none), "");
    }

    #[test]
    fn test_render_only_extras() {
        let extras = vec!["--index-url https://example.org/simple".to_string()];
        assert_eq!(
            render(&DependencyAggregate::new(), &extras),
            "--index-url https://example.org/simple\n"
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".venv").join("requirements.txt");
        let writer = RequirementsWriter::new(WriteMode::Write);

        let result = writer.apply(&path, "rich\n").unwrap();
        assert_eq!(result.status, WriteStatus::Written);
        assert!(result.file_modified());
        assert!(result.previous.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "rich\n");
    }

    #[test]
    fn test_write_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "rich\n").unwrap();

        let result = RequirementsWriter::new(WriteMode::Write)
            .apply(&path, "rich\n")
            .unwrap();
        assert_eq!(result.status, WriteStatus::Unchanged);
        assert!(!result.file_modified());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "old\n").unwrap();

        let result = RequirementsWriter::new(WriteMode::Write)
            .apply(&path, "new\n")
            .unwrap();
        assert_eq!(result.status, WriteStatus::Written);
        assert_eq!(result.previous.as_deref(), Some("old\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".venv").join("requirements.txt");

        let result = RequirementsWriter::new(WriteMode::DryRun)
            .apply(&path, "rich\n")
            .unwrap();
        assert_eq!(result.status, WriteStatus::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn test_check_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        let writer = RequirementsWriter::new(WriteMode::Check);

        let missing = writer.apply(&path, "rich\n").unwrap();
        assert!(missing.status.is_stale());

        fs::write(&path, "rich\n").unwrap();
        assert_eq!(
            writer.apply(&path, "rich\n").unwrap().status,
            WriteStatus::UpToDate
        );

        let stale = writer.apply(&path, "rich>=13.0.0\n").unwrap();
        assert!(stale.status.is_stale());
        assert_eq!(fs::read_to_string(&path).unwrap(), "rich\n");
    }

    #[test]
    fn test_check_accepts_missing_final_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "numpy\ntorch==2.0.0").unwrap();

        let check = RequirementsWriter::new(WriteMode::Check);
        assert_eq!(
            check.apply(&path, "numpy\ntorch==2.0.0\n").unwrap().status,
            WriteStatus::UpToDate
        );
        assert!(check.apply(&path, "numpy\n").unwrap().status.is_stale());

        let write = RequirementsWriter::new(WriteMode::Write);
        assert_eq!(
            write.apply(&path, "numpy\ntorch==2.0.0\n").unwrap().status,
            WriteStatus::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "numpy\ntorch==2.0.0\n");
    }

    #[test]
    fn test_write_error_when_parent_is_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join(".venv");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_output(&blocker.join("requirements.txt"), "rich\n").unwrap_err();
        assert!(matches!(err, OutputError::CreateDirError { .. }));
    }
}
