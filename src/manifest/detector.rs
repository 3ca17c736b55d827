//! Extension directory discovery
//!
//! Every subdirectory of the extensions directory is an extension. They are
//! returned sorted by directory name so merge order (and therefore conflict
//! reports) is the same on every file system.

use crate::error::SourceError;
use std::path::{Path, PathBuf};

/// A discovered extension directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDir {
    /// Directory name, used as the source label
    pub name: String,
    /// Path to the extension directory
    pub path: PathBuf,
    /// Path where the manifest is expected
    pub manifest_path: PathBuf,
}

impl ExtensionDir {
    /// Create a new ExtensionDir
    pub fn new(path: impl Into<PathBuf>, manifest_name: &str) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            manifest_path: path.join(manifest_name),
            path,
        }
    }

    /// Returns true if the manifest file exists
    pub fn has_manifest(&self) -> bool {
        self.manifest_path.is_file()
    }
}

/// List extension directories in sorted name order
///
/// A missing extensions directory yields `Ok(None)` so the caller can warn and
/// carry on with the core requirements alone.
pub fn discover_extensions(
    dir: &Path,
    manifest_name: &str,
) -> Result<Option<Vec<ExtensionDir>>, SourceError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SourceError::ExtensionsDirError {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut extensions: Vec<ExtensionDir> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| ExtensionDir::new(entry.path(), manifest_name))
        .collect();
    extensions.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Some(extensions))
}
