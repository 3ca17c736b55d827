//! Requirement and constraint parsers
//!
//! This module provides:
//! - Line classification for requirements files (blank, comment, passthrough, declaration)
//! - An ordered chain of declaration parsing strategies that never fails
//! - Constraint token parsing into version intervals

mod constraint;
mod requirement;

pub use constraint::{parse_constraint, parse_constraint_str, parse_version};
pub use requirement::{Identity, PrimaryGrammar, RawRequirement, StrategyKind, WhitespaceSplit};

use crate::domain::Requirement;
use regex::Regex;
use std::sync::LazyLock;

// pip treats `#` preceded by whitespace as the start of a comment
static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#.*$").unwrap());

/// Passthrough markers recognized by default
pub const DEFAULT_PASSTHROUGH_PREFIXES: &[&str] = &[
    "--extra-index-url",
    "--index-url",
    "--find-links",
    "--trusted-host",
];

/// Trait for one declaration parsing strategy
pub trait ParseStrategy {
    /// Try to decompose a trimmed declaration line
    fn parse(&self, line: &str) -> Option<RawRequirement>;

    /// Returns which strategy this is
    fn kind(&self) -> StrategyKind;
}

/// Classification of one line of a requirements file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace only
    Blank,
    /// Full-line `#` comment
    Comment,
    /// Index option carried to the output verbatim
    Passthrough(&'a str),
    /// A dependency declaration, trimmed and with any inline comment removed
    Declaration(&'a str),
}

/// Classifies a requirements file line
pub fn classify_line<'a, S: AsRef<str>>(line: &'a str, passthrough_prefixes: &[S]) -> Line<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with('#') {
        return Line::Comment;
    }
    if passthrough_prefixes
        .iter()
        .any(|prefix| trimmed.starts_with(prefix.as_ref()))
    {
        return Line::Passthrough(trimmed);
    }

    let declaration = match INLINE_COMMENT_RE.find(trimmed) {
        Some(m) => trimmed[..m.start()].trim_end(),
        None => trimmed,
    };
    Line::Declaration(declaration)
}

/// Declaration parser built from an ordered chain of strategies
///
/// The chain always ends in `Identity`, so parsing never fails.
pub struct RequirementParser {
    strategies: Vec<Box<dyn ParseStrategy + Send + Sync>>,
}

impl Default for RequirementParser {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(PrimaryGrammar),
                Box::new(WhitespaceSplit),
                Box::new(Identity),
            ],
        }
    }
}

impl RequirementParser {
    /// Create the default parser chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration line into a requirement
    pub fn parse(&self, line: &str) -> Requirement {
        self.parse_detailed(line).0
    }

    /// Parse a declaration line, also reporting which strategy matched
    pub fn parse_detailed(&self, line: &str) -> (Requirement, StrategyKind) {
        let trimmed = line.trim();
        let (raw, kind) = self
            .strategies
            .iter()
            .find_map(|strategy| strategy.parse(trimmed).map(|raw| (raw, strategy.kind())))
            .unwrap_or_else(|| {
                let raw = RawRequirement {
                    name: trimmed.to_string(),
                    constraint: None,
                };
                (raw, StrategyKind::Identity)
            });

        if kind.is_fallback() {
            tracing::debug!(line = trimmed, strategy = ?kind, "declaration parsed with fallback strategy");
        }

        let constraint = parse_constraint(raw.constraint.as_deref());
        (Requirement::new(raw.name, constraint), kind)
    }
}
