//! Merge orchestrator coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: load sources → merge → render → write
//! - Dry-run and check mode support
//! - Diagnostics collection with partial continuation

use crate::config::MergeConfig;
use crate::error::AppError;
use crate::manifest::{LoadedSources, SourceLoader};
use crate::merge::{merge, MergeOutcome};
use crate::progress::Progress;
use crate::writer::{render, RequirementsWriter, WriteMode, WriteResult};

/// Orchestrator for one merge run
pub struct Orchestrator {
    /// Resolved configuration
    config: MergeConfig,
    /// What to do with the rendered output
    mode: WriteMode,
}

/// Result of running the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorResult {
    /// Configuration the run used
    pub config: MergeConfig,
    /// Sources that were read
    pub sources: LoadedSources,
    /// Merged aggregate with conflicts and notes
    pub outcome: MergeOutcome,
    /// Rendered output file content
    pub rendered: String,
    /// What happened to the output file
    pub write: WriteResult,
}

impl OrchestratorResult {
    /// Returns true if check mode found the output out of date
    pub fn is_stale(&self) -> bool {
        self.write.status.is_stale()
    }

    /// Returns true if any update was rejected during the merge
    pub fn has_conflicts(&self) -> bool {
        self.outcome.has_conflicts()
    }
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: MergeConfig, mode: WriteMode) -> Self {
        Self { config, mode }
    }

    /// Run the merge workflow without progress display
    pub fn run(&self) -> Result<OrchestratorResult, AppError> {
        self.run_with_progress(false)
    }

    /// Run the merge workflow
    ///
    /// Fails only on a missing or unreadable core file or when the output
    /// cannot be read or written. Conflicts and skipped extensions are
    /// reported in the result.
    pub fn run_with_progress(&self, show_progress: bool) -> Result<OrchestratorResult, AppError> {
        let mut progress = Progress::new(show_progress);

        // Step 1: Read the core file and extension manifests
        tracing::debug!(
            platform = %self.config.platform,
            core = %self.config.core_file.display(),
            "loading requirement sources"
        );
        let sources = SourceLoader::new(&self.config).load_with_progress(&mut progress)?;

        // Step 2: Fold everything into the aggregate
        progress.begin_merge(sources.requirements.len());
        let outcome = merge(sources.requirements.iter().cloned());
        progress.finish();

        for conflict in &outcome.conflicts {
            tracing::warn!("{}", conflict);
        }
        for note in &outcome.notes {
            tracing::info!("{}", note);
        }
        tracing::debug!(
            packages = outcome.aggregate.len(),
            conflicts = outcome.conflicts.len(),
            "merge complete"
        );

        // Step 3: Render and hand to the writer
        let rendered = render(&outcome.aggregate, &sources.extra_index_lines);
        let write = RequirementsWriter::new(self.mode).apply(&self.config.output, &rendered)?;
        if write.file_modified() {
            tracing::info!(path = %write.path.display(), "wrote merged requirements");
        } else {
            tracing::debug!(path = %write.path.display(), status = ?write.status, "output not written");
        }

        Ok(OrchestratorResult {
            config: self.config.clone(),
            sources,
            outcome,
            rendered,
            write,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConflictKind, Platform};
    use crate::error::SourceError;
    use crate::writer::WriteStatus;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn manifest(config: &MergeConfig, extension: &str, deps: &[&str]) {
        let mut content = format!("name: {}\nserver:\n  dependencies:\n", extension);
        for dep in deps {
            content.push_str(&format!("    - \"{}\"\n", dep));
        }
        write(
            &config.extensions_dir.join(extension).join("ssextension.yaml"),
            &content,
        );
    }

    fn setup(core: &str) -> (TempDir, MergeConfig) {
        let dir = TempDir::new().unwrap();
        let config = MergeConfig::new(dir.path(), Platform::Linux);
        write(&config.core_file, core);
        (dir, config)
    }

    #[test]
    fn test_run_writes_merged_file() {
        let (_dir, config) = setup("numpy>=1.20,<2.0\n");
        manifest(&config, "Image", &["numpy^1.22.0", "Pillow"]);

        let result = Orchestrator::new(config.clone(), WriteMode::Write)
            .run()
            .unwrap();

        assert_eq!(result.rendered, "numpy>=1.22.0,<2.0.0\nPillow\n");
        assert_eq!(result.write.status, WriteStatus::Written);
        assert_eq!(
            fs::read_to_string(&config.output).unwrap(),
            "numpy>=1.22.0,<2.0.0\nPillow\n"
        );
    }

    #[test]
    fn test_conflict_is_not_fatal() {
        let (_dir, config) = setup("torch==2.0.0\n");
        manifest(&config, "Video", &["torch>=2.1.0"]);

        let result = Orchestrator::new(config, WriteMode::Write).run().unwrap();
        assert!(result.has_conflicts());
        assert_eq!(
            result.outcome.conflicts[0].kind,
            ConflictKind::EmptyIntersection
        );
        assert_eq!(result.rendered, "torch==2.0.0\n");
    }

    #[test]
    fn test_missing_core_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = MergeConfig::new(dir.path(), Platform::Linux);
        let err = Orchestrator::new(config.clone(), WriteMode::Write)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Source(SourceError::CoreNotFound { .. })
        ));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_dry_run_leaves_output_untouched() {
        let (_dir, config) = setup("rich\n");
        let result = Orchestrator::new(config.clone(), WriteMode::DryRun)
            .run()
            .unwrap();
        assert_eq!(result.rendered, "rich\n");
        assert_eq!(result.write.status, WriteStatus::Skipped);
        assert!(!config.output.exists());
    }

    #[test]
    fn test_check_reports_stale_then_up_to_date() {
        let (_dir, config) = setup("rich\n");
        let check = Orchestrator::new(config.clone(), WriteMode::Check);
        assert!(check.run().unwrap().is_stale());

        Orchestrator::new(config.clone(), WriteMode::Write)
            .run()
            .unwrap();
        assert!(!check.run().unwrap().is_stale());
    }

    #[test]
    fn test_passthrough_lines_appended() {
        let (_dir, config) = setup(
            "--extra-index-url https://download.pytorch.org/whl/cu118\ntorch==2.0.0\n",
        );
        let result = Orchestrator::new(config, WriteMode::DryRun).run().unwrap();
        assert_eq!(
            result.rendered,
            "torch==2.0.0\n--extra-index-url https://download.pytorch.org/whl/cu118\n"
        );
    }
}
