//! Extension manifest (`ssextension.yaml`) model
//!
//! Only the fields the merge needs are modelled, all optional:
//! - `name`, `version`
//! - `server.venv`, `server.dependencies`, `server.main`
//!
//! Other top-level sections (such as `web_ui`) are ignored. Known fields with the
//! wrong type fail validation and the extension is skipped.

use crate::error::SourceError;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// Parsed extension manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtensionManifest {
    /// Display name of the extension
    pub name: Option<String>,
    /// Extension version
    pub version: Option<String>,
    /// Server-side configuration
    pub server: Option<ServerSection>,
}

/// The `server` section of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Virtual environment the extension runs in
    pub venv: Option<String>,
    /// Dependency declarations, one requirement line each
    pub dependencies: Option<Vec<String>>,
    /// Entry script
    pub main: Option<String>,
}

impl ExtensionManifest {
    /// Parse and validate manifest content
    ///
    /// Malformed YAML is a parse error; well-formed YAML with the wrong shape is
    /// an invalid manifest. An empty document is a manifest without dependencies.
    pub fn parse(content: &str, path: &Path) -> Result<Self, SourceError> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| SourceError::manifest_parse_error(path, e.to_string()))?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => serde_yaml::from_value(value)
                .map_err(|e| SourceError::invalid_manifest(path, e.to_string())),
            _ => Err(SourceError::invalid_manifest(
                path,
                "top level must be a mapping",
            )),
        }
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourceError::manifest_read_error(path, e))?;
        Self::parse(&content, path)
    }

    /// Non-blank dependency declarations in manifest order
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.server
            .iter()
            .filter_map(|server| server.dependencies.as_ref())
            .flatten()
            .map(|dep| dep.trim())
            .filter(|dep| !dep.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ExtensionManifest, SourceError> {
        ExtensionManifest::parse(content, Path::new("ssextension.yaml"))
    }

    #[test]
    fn test_parse_full_manifest() {
        let manifest = parse(
            r#"
name: Image
version: 0.1.0
server:
  venv: shared
  main: extension.py
  dependencies:
    - numpy^1.22.0
    - "opencv-python>=4.8"
web_ui:
  dist: dist
"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("Image"));
        assert_eq!(manifest.version.as_deref(), Some("0.1.0"));
        let deps: Vec<&str> = manifest.dependencies().collect();
        assert_eq!(deps, vec!["numpy^1.22.0", "opencv-python>=4.8"]);
    }

    #[test]
    fn test_parse_without_server() {
        let manifest = parse("name: Viewer\n").unwrap();
        assert_eq!(manifest.dependencies().count(), 0);
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse("").unwrap(), ExtensionManifest::default());
    }

    #[test]
    fn test_blank_entries_skipped() {
        let manifest = parse("server:\n  dependencies:\n    - rich\n    - '  '\n").unwrap();
        let deps: Vec<&str> = manifest.dependencies().collect();
        assert_eq!(deps, vec!["rich"]);
    }

    #[test]
    fn test_dependencies_not_a_list() {
        let err = parse("server:\n  dependencies: numpy\n").unwrap_err();
        assert!(matches!(err, SourceError::InvalidManifest { .. }));
    }

    #[test]
    fn test_dependency_entry_not_a_string() {
        let err = parse("server:\n  dependencies:\n    - {name: numpy}\n").unwrap_err();
        assert!(matches!(err, SourceError::InvalidManifest { .. }));
    }

    #[test]
    fn test_top_level_list_rejected() {
        let err = parse("- numpy\n- torch\n").unwrap_err();
        assert!(matches!(err, SourceError::InvalidManifest { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("server: [unclosed\n").unwrap_err();
        assert!(matches!(err, SourceError::ManifestParseError { .. }));
    }
}
