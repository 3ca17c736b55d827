//! Run configuration
//!
//! Values are layered: command-line flags override `reqmerge.toml` at the
//! invocation root, which overrides the built-in layout defaults. Relative paths
//! resolve against the root.

use crate::cli::CliArgs;
use crate::domain::Platform;
use crate::error::ConfigError;
use crate::parser::DEFAULT_PASSTHROUGH_PREFIXES;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file at the invocation root
pub const CONFIG_FILENAME: &str = "reqmerge.toml";

/// Default directory holding the platform core requirement files
pub const DEFAULT_CORE_DIR: &str = "dependencies";

/// Default directory holding one subdirectory per extension
pub const DEFAULT_EXTENSIONS_DIR: &str = "extensions";

/// Default extension manifest filename
pub const DEFAULT_MANIFEST_NAME: &str = "ssextension.yaml";

/// Default output location relative to the root
pub const DEFAULT_OUTPUT: &str = ".venv/requirements.txt";

/// Contents of `reqmerge.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Platform identifier overriding host detection
    pub platform: Option<String>,
    /// Directory containing `requirements-<platform>.txt`
    pub core_dir: Option<PathBuf>,
    /// Explicit core requirements file, wins over `core_dir`
    pub core_file: Option<PathBuf>,
    /// Directory containing extension subdirectories
    pub extensions_dir: Option<PathBuf>,
    /// Manifest filename inside each extension directory
    pub manifest_name: Option<String>,
    /// Output artifact path
    pub output: Option<PathBuf>,
    /// Line prefixes copied verbatim from the core file to the output
    pub passthrough_prefixes: Option<Vec<String>>,
}

impl FileConfig {
    /// Parse config file content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::invalid_file(path, e.to_string()))
    }

    /// Load `reqmerge.toml` from `root` if it exists
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(CONFIG_FILENAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::parse(&content, &path).map(Some)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::ReadError { path, source: e }),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Invocation root
    pub root: PathBuf,
    /// Platform selecting the core file
    pub platform: Platform,
    /// Core requirements file
    pub core_file: PathBuf,
    /// Directory scanned for extensions
    pub extensions_dir: PathBuf,
    /// Manifest filename inside each extension directory
    pub manifest_name: String,
    /// Output artifact path
    pub output: PathBuf,
    /// Passthrough line prefixes
    pub passthrough_prefixes: Vec<String>,
}

impl MergeConfig {
    /// Default layout under `root` for the given platform
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        let root = root.into();
        Self {
            core_file: root
                .join(DEFAULT_CORE_DIR)
                .join(platform.requirements_filename()),
            extensions_dir: root.join(DEFAULT_EXTENSIONS_DIR),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            output: root.join(DEFAULT_OUTPUT),
            passthrough_prefixes: DEFAULT_PASSTHROUGH_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            platform,
            root,
        }
    }

    /// Resolve configuration from CLI arguments and the optional config file
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.verbose && args.quiet {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        if args.check && args.dry_run {
            return Err(ConfigError::ConflictingOptions {
                message: "--check and --dry-run cannot be used together".to_string(),
            });
        }

        let file = FileConfig::load(&args.path)?.unwrap_or_default();
        Self::resolve(args, file)
    }

    /// Layer CLI arguments over an already loaded config file
    pub fn resolve(args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let root = args.path.clone();

        let platform = match args.platform.as_deref().or(file.platform.as_deref()) {
            Some(id) => id.parse::<Platform>()?,
            None => Platform::detect()?,
        };

        let mut config = Self::new(&root, platform);

        if let Some(dir) = file.core_dir {
            config.core_file = root.join(dir).join(platform.requirements_filename());
        }
        if let Some(path) = args.core_file.clone().or(file.core_file) {
            config.core_file = root.join(path);
        }
        if let Some(dir) = args.extensions_dir.clone().or(file.extensions_dir) {
            config.extensions_dir = root.join(dir);
        }
        if let Some(name) = args.manifest_name.clone().or(file.manifest_name) {
            config.manifest_name = name;
        }
        if let Some(path) = args.output.clone().or(file.output) {
            config.output = root.join(path);
        }
        if let Some(prefixes) = file.passthrough_prefixes {
            config.passthrough_prefixes = prefixes;
        }

        Ok(config)
    }
}
