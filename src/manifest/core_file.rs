//! Platform core requirements file reader
//!
//! Handles:
//! - One declaration per line
//! - Full-line and trailing `#` comments
//! - Index option lines carried verbatim to the output

use crate::domain::{Platform, Requirement};
use crate::error::SourceError;
use crate::parser::{classify_line, Line, RequirementParser};
use std::path::{Path, PathBuf};

/// Declarations and passthrough lines read from the core file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreRequirements {
    /// Path the file was read from
    pub path: PathBuf,
    /// Platform the file belongs to
    pub platform: Platform,
    /// Declarations in file order
    pub requirements: Vec<Requirement>,
    /// Passthrough lines in file order
    pub extra_index_lines: Vec<String>,
}

/// Split core file content into declarations and passthrough lines
pub fn parse_core_content<S: AsRef<str>>(
    content: &str,
    parser: &RequirementParser,
    passthrough_prefixes: &[S],
) -> (Vec<Requirement>, Vec<String>) {
    let mut requirements = Vec::new();
    let mut extra_index_lines = Vec::new();

    for line in content.lines() {
        match classify_line(line, passthrough_prefixes) {
            Line::Blank | Line::Comment => {}
            Line::Passthrough(text) => extra_index_lines.push(text.to_string()),
            Line::Declaration(text) => requirements.push(parser.parse(text)),
        }
    }

    (requirements, extra_index_lines)
}

/// Read and parse the core requirements file
///
/// A missing file is fatal: there is no sensible default dependency set.
pub fn load_core_requirements<S: AsRef<str>>(
    path: &Path,
    platform: Platform,
    parser: &RequirementParser,
    passthrough_prefixes: &[S],
) -> Result<CoreRequirements, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::core_not_found(path)
        } else {
            SourceError::core_read_error(path, e)
        }
    })?;

    let (requirements, extra_index_lines) =
        parse_core_content(&content, parser, passthrough_prefixes);

    tracing::debug!(
        path = %path.display(),
        declarations = requirements.len(),
        passthrough = extra_index_lines.len(),
        "loaded core requirements"
    );

    Ok(CoreRequirements {
        path: path.to_path_buf(),
        platform,
        requirements,
        extra_index_lines,
    })
}
