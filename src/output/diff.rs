//! Diff output formatter for showing changes
//!
//! Prints a unified diff between the requirements file on disk and the
//! freshly rendered content.

use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use crate::writer::WriteStatus;
use similar::TextDiff;
use std::io::Write;

/// Lines of context around each hunk
const CONTEXT_RADIUS: usize = 3;

/// Diff formatter for showing requirement changes
#[derive(Default)]
pub struct DiffFormatter;

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new() -> Self {
        Self
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self, result: &OrchestratorResult) -> &'static str {
        if result.write.status == WriteStatus::Skipped {
            "(dry-run) "
        } else {
            ""
        }
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let old = result.write.previous.as_deref().unwrap_or("");
        let new = result.rendered.as_str();

        if old != new {
            let path = result
                .write
                .path
                .strip_prefix(&result.config.root)
                .unwrap_or(&result.write.path)
                .display()
                .to_string();
            let old_header = if result.write.previous.is_some() {
                format!("a/{}", path)
            } else {
                "/dev/null".to_string()
            };
            let new_header = format!("b/{}", path);

            let diff = TextDiff::from_lines(old, new);
            let mut unified = diff.unified_diff();
            unified
                .context_radius(CONTEXT_RADIUS)
                .header(&old_header, &new_header);
            write!(writer, "{}", unified)?;
            writeln!(writer)?;
        }

        self.format_summary(result, writer)
    }

    fn format_summary(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let changed = result.write.previous.as_deref() != Some(result.rendered.as_str());

        writeln!(
            writer,
            "{}# {} package(s), {} conflict(s), {}",
            self.dry_run_prefix(result),
            result.outcome.aggregate.len(),
            result.outcome.conflicts.len(),
            if changed { "changed" } else { "no changes" }
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_result;
    use crate::writer::WriteMode;

    fn render(result: &OrchestratorResult) -> String {
        let mut buf = Vec::new();
        DiffFormatter::new().format(result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_diff_against_previous_file() {
        let (_dir, result) = sample_result(WriteMode::DryRun);
        let output = render(&result);

        assert!(output.contains("--- a/.venv/requirements.txt"));
        assert!(output.contains("+++ b/.venv/requirements.txt"));
        assert!(output.contains("+numpy>=1.22.0,<2.0.0"));
        assert!(output.contains(" torch==2.0.0"));
        assert!(output.contains("+--extra-index-url https://download.pytorch.org/whl/cu118"));
        assert!(output.contains("(dry-run) # 4 package(s), 1 conflict(s), changed"));
    }

    #[test]
    fn test_diff_without_changes() {
        let (_dir, mut result) = sample_result(WriteMode::Write);
        result.write.previous = Some(result.rendered.clone());
        let output = render(&result);

        assert!(!output.contains("---"));
        assert_eq!(output, "# 4 package(s), 1 conflict(s), no changes\n");
    }

    #[test]
    fn test_diff_new_file() {
        let (_dir, mut result) = sample_result(WriteMode::DryRun);
        result.write.previous = None;
        let output = render(&result);
        assert!(output.contains("--- /dev/null"));
    }
}
