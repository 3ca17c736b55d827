//! Labels identifying where a declaration came from

use super::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Origin of a dependency declaration, used in every diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceLabel {
    /// The platform core requirements file
    Core { platform: Platform, path: PathBuf },
    /// One extension manifest, identified by its directory name
    Extension { name: String },
}

impl SourceLabel {
    /// Creates a label for the core requirements file
    pub fn core(platform: Platform, path: impl Into<PathBuf>) -> Self {
        SourceLabel::Core {
            platform,
            path: path.into(),
        }
    }

    /// Creates a label for an extension
    pub fn extension(name: impl Into<String>) -> Self {
        SourceLabel::Extension { name: name.into() }
    }

    /// Returns true for the core file
    pub fn is_core(&self) -> bool {
        matches!(self, SourceLabel::Core { .. })
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Core { path, .. } => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                write!(f, "core ({})", file)
            }
            SourceLabel::Extension { name } => write!(f, "extension '{}'", name),
        }
    }
}
