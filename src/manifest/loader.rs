//! Source loader producing the ordered stream of tagged requirements
//!
//! Order is fixed: the core file first, then each extension in sorted
//! directory-name order. Per-extension failures are recorded and skipped.

use crate::config::MergeConfig;
use crate::domain::{SourceLabel, TaggedRequirement};
use crate::error::SourceError;
use crate::manifest::{
    discover_extensions, load_core_requirements, ExtensionDir, ExtensionManifest,
};
use crate::parser::RequirementParser;
use crate::progress::Progress;
use std::fmt;
use std::path::PathBuf;

/// What happened when an extension was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// Manifest read; number of declarations contributed
    Loaded { declarations: usize },
    /// No manifest file in the extension directory
    MissingManifest,
    /// Manifest unreadable, malformed or invalid
    Failed { reason: String },
}

impl fmt::Display for ExtensionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionOutcome::Loaded { declarations } => {
                write!(f, "{} declaration(s)", declarations)
            }
            ExtensionOutcome::MissingManifest => write!(f, "no manifest"),
            ExtensionOutcome::Failed { reason } => write!(f, "skipped: {}", reason),
        }
    }
}

/// Load record for one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionLoad {
    /// Extension directory name
    pub name: String,
    /// Expected manifest path
    pub manifest_path: PathBuf,
    /// Result of loading
    pub outcome: ExtensionOutcome,
}

impl ExtensionLoad {
    /// Returns true if the extension contributed nothing because of an error
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ExtensionOutcome::Failed { .. })
    }
}

/// State of the extensions directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionsScan {
    /// Directory listed successfully
    Scanned,
    /// Directory does not exist
    DirectoryMissing,
    /// Directory exists but could not be listed
    DirectoryUnreadable { reason: String },
}

/// Everything read from the sources, ready for the merge
#[derive(Debug, Clone)]
pub struct LoadedSources {
    /// Core requirements file path
    pub core_path: PathBuf,
    /// Requirements in merge order
    pub requirements: Vec<TaggedRequirement>,
    /// Passthrough lines from the core file
    pub extra_index_lines: Vec<String>,
    /// Per-extension load records in merge order
    pub extensions: Vec<ExtensionLoad>,
    /// Extensions directory scan state
    pub scan: ExtensionsScan,
}

impl LoadedSources {
    /// Extensions that were skipped because of an error
    pub fn failed_extensions(&self) -> impl Iterator<Item = &ExtensionLoad> {
        self.extensions.iter().filter(|e| e.is_failure())
    }
}

/// Reads the core file and extension manifests described by a `MergeConfig`
pub struct SourceLoader<'a> {
    config: &'a MergeConfig,
    parser: RequirementParser,
}

impl<'a> SourceLoader<'a> {
    /// Create a loader for the given configuration
    pub fn new(config: &'a MergeConfig) -> Self {
        Self {
            config,
            parser: RequirementParser::new(),
        }
    }

    /// Load all sources without progress display
    pub fn load(&self) -> Result<LoadedSources, SourceError> {
        self.load_with_progress(&mut Progress::disabled())
    }

    /// Load all sources
    ///
    /// Only a missing or unreadable core file is an error.
    pub fn load_with_progress(&self, progress: &mut Progress) -> Result<LoadedSources, SourceError> {
        let core = load_core_requirements(
            &self.config.core_file,
            self.config.platform,
            &self.parser,
            &self.config.passthrough_prefixes,
        )?;

        let core_label = SourceLabel::core(core.platform, &core.path);
        let mut requirements: Vec<TaggedRequirement> = core
            .requirements
            .into_iter()
            .map(|req| TaggedRequirement::new(core_label.clone(), req))
            .collect();

        let mut extensions = Vec::new();
        let scan = match discover_extensions(&self.config.extensions_dir, &self.config.manifest_name)
        {
            Ok(Some(dirs)) => {
                progress.begin_scan(dirs.len());
                for dir in &dirs {
                    progress.scanning(&dir.name);
                    let (load, tagged) = self.load_extension(dir);
                    progress.scanned(&dir.name, &load.outcome);
                    requirements.extend(tagged);
                    extensions.push(load);
                }
                progress.finish();
                ExtensionsScan::Scanned
            }
            Ok(None) => {
                tracing::warn!(
                    path = %self.config.extensions_dir.display(),
                    "extensions directory not found; using core requirements only"
                );
                ExtensionsScan::DirectoryMissing
            }
            Err(e) => {
                tracing::warn!("{}; using core requirements only", e);
                ExtensionsScan::DirectoryUnreadable {
                    reason: e.to_string(),
                }
            }
        };

        Ok(LoadedSources {
            core_path: core.path,
            requirements,
            extra_index_lines: core.extra_index_lines,
            extensions,
            scan,
        })
    }

    /// Load one extension; failures are logged and reported, never returned
    pub fn load_extension(&self, dir: &ExtensionDir) -> (ExtensionLoad, Vec<TaggedRequirement>) {
        let record = |outcome| ExtensionLoad {
            name: dir.name.clone(),
            manifest_path: dir.manifest_path.clone(),
            outcome,
        };

        if !dir.has_manifest() {
            tracing::debug!(extension = %dir.name, "no manifest found, skipping");
            return (record(ExtensionOutcome::MissingManifest), Vec::new());
        }

        let manifest = match ExtensionManifest::load(&dir.manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(extension = %dir.name, "skipping extension: {}", e);
                return (
                    record(ExtensionOutcome::Failed {
                        reason: e.to_string(),
                    }),
                    Vec::new(),
                );
            }
        };

        let label = SourceLabel::extension(&dir.name);
        let tagged: Vec<TaggedRequirement> = manifest
            .dependencies()
            .map(|line| TaggedRequirement::new(label.clone(), self.parser.parse(line)))
            .collect();

        (
            record(ExtensionOutcome::Loaded {
                declarations: tagged.len(),
            }),
            tagged,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Platform;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn setup() -> (tempfile::TempDir, MergeConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::new(dir.path(), Platform::Linux);
        write(
            &config.core_file,
            "torch==2.0.0\n--extra-index-url https://download.pytorch.org/whl/cu118\n",
        );
        (dir, config)
    }

    #[test]
    fn test_core_only_without_extensions_dir() {
        let (_dir, config) = setup();
        let loaded = SourceLoader::new(&config).load().unwrap();
        assert_eq!(loaded.requirements.len(), 1);
        assert!(loaded.requirements[0].source.is_core());
        assert_eq!(loaded.extra_index_lines.len(), 1);
        assert_eq!(loaded.scan, ExtensionsScan::DirectoryMissing);
    }

    #[test]
    fn test_missing_core_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig::new(dir.path(), Platform::Linux);
        let err = SourceLoader::new(&config).load().unwrap_err();
        assert!(matches!(err, SourceError::CoreNotFound { .. }));
    }

    #[test]
    fn test_extensions_in_sorted_order() {
        let (_dir, config) = setup();
        write(
            &config.extensions_dir.join("Video").join("ssextension.yaml"),
            "server:\n  dependencies:\n    - av>=10.0\n",
        );
        write(
            &config.extensions_dir.join("Audio").join("ssextension.yaml"),
            "server:\n  dependencies:\n    - librosa\n    - soundfile\n",
        );

        let loaded = SourceLoader::new(&config).load().unwrap();
        let sources: Vec<String> = loaded
            .requirements
            .iter()
            .map(|t| t.source.to_string())
            .collect();
        assert_eq!(
            sources,
            vec![
                "core (requirements-linux.txt)",
                "extension 'Audio'",
                "extension 'Audio'",
                "extension 'Video'",
            ]
        );
        assert_eq!(loaded.scan, ExtensionsScan::Scanned);
        assert_eq!(
            loaded.extensions[0].outcome,
            ExtensionOutcome::Loaded { declarations: 2 }
        );
    }

    #[test]
    fn test_missing_and_broken_manifests_are_skipped() {
        let (_dir, config) = setup();
        fs::create_dir_all(config.extensions_dir.join("Empty")).unwrap();
        write(
            &config.extensions_dir.join("Broken").join("ssextension.yaml"),
            "server: [unclosed\n",
        );
        write(
            &config.extensions_dir.join("Good").join("ssextension.yaml"),
            "server:\n  dependencies:\n    - rich\n",
        );

        let loaded = SourceLoader::new(&config).load().unwrap();
        let outcomes: Vec<(&str, bool)> = loaded
            .extensions
            .iter()
            .map(|e| (e.name.as_str(), e.is_failure()))
            .collect();
        assert_eq!(
            outcomes,
            vec![("Broken", true), ("Empty", false), ("Good", false)]
        );
        assert_eq!(loaded.extensions[1].outcome, ExtensionOutcome::MissingManifest);
        assert_eq!(loaded.failed_extensions().count(), 1);
        assert!(loaded
            .requirements
            .iter()
            .any(|t| t.requirement.name == "rich"));
    }

    #[test]
    fn test_custom_manifest_name() {
        let (_dir, mut config) = setup();
        config.manifest_name = "plugin.yaml".to_string();
        write(
            &config.extensions_dir.join("Image").join("plugin.yaml"),
            "server:\n  dependencies:\n    - pillow\n",
        );

        let loaded = SourceLoader::new(&config).load().unwrap();
        assert_eq!(loaded.requirements.len(), 2);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            ExtensionOutcome::Loaded { declarations: 3 }.to_string(),
            "3 declaration(s)"
        );
        assert_eq!(ExtensionOutcome::MissingManifest.to_string(), "no manifest");
    }
}
