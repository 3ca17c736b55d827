//! Requirement declarations and package name normalization

use super::{Constraint, SourceLabel};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// One parsed declaration: a package name and an optional constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Package name as written, extras marker included (e.g. `uvicorn[standard]`)
    pub name: String,
    /// Version constraint; `None` means no restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl Requirement {
    /// Creates a new requirement
    pub fn new(name: impl Into<String>, constraint: Option<Constraint>) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// Creates a requirement without a version restriction
    pub fn unconstrained(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Returns the key this requirement merges under
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint {
            Some(ref constraint) => write!(f, "{}{}", self.name, constraint),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Normalizes a package name for use as a merge key
///
/// The base name is lowercased with runs of `-`, `_` and `.` collapsed to a
/// single `-`. Extras are normalized the same way, deduplicated and sorted, so
/// `Foo_Bar[b,a]` and `foo-bar[a,b]` share a key.
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    let (base, extras) = match name.find('[') {
        Some(idx) => (&name[..idx], Some(&name[idx..])),
        None => (name, None),
    };

    let mut key = normalize_segment(base);

    if let Some(extras) = extras {
        let mut items: Vec<String> = extras
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(normalize_segment)
            .filter(|s| !s.is_empty())
            .collect();
        items.sort();
        items.dedup();
        if !items.is_empty() {
            key.push('[');
            key.push_str(&items.join(","));
            key.push(']');
        }
    }

    key
}

fn normalize_segment(segment: &str) -> String {
    SEPARATOR_RUN_RE
        .replace_all(segment.trim(), "-")
        .to_ascii_lowercase()
}

/// A requirement tagged with the source it was declared in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRequirement {
    /// Where the declaration came from
    pub source: SourceLabel,
    /// The parsed declaration
    pub requirement: Requirement,
}

impl TaggedRequirement {
    /// Creates a new tagged requirement
    pub fn new(source: SourceLabel, requirement: Requirement) -> Self {
        Self {
            source,
            requirement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionConstraint;

    #[test]
    fn test_normalize_simple() {
        assert_eq!(normalize_name("numpy"), "numpy");
        assert_eq!(normalize_name("Pillow"), "pillow");
        assert_eq!(normalize_name("typing_extensions"), "typing-extensions");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("a__-.b"), "a-b");
    }

    #[test]
    fn test_normalize_extras() {
        assert_eq!(normalize_name("uvicorn[standard]"), "uvicorn[standard]");
        assert_eq!(normalize_name("Foo_Bar[b,A]"), "foo-bar[a,b]");
        assert_eq!(normalize_name("foo[a, a]"), "foo[a]");
        assert_eq!(normalize_name("foo[]"), "foo");
    }

    #[test]
    fn test_extras_are_distinct_keys() {
        assert_ne!(normalize_name("uvicorn"), normalize_name("uvicorn[standard]"));
    }

    #[test]
    fn test_requirement_key() {
        let req = Requirement::unconstrained("Typing_Extensions");
        assert_eq!(req.key(), "typing-extensions");
        assert_eq!(req.name, "Typing_Extensions");
    }

    #[test]
    fn test_requirement_display() {
        let req = Requirement::new(
            "torch",
            Some(VersionConstraint::exact(semver::Version::new(2, 0, 0)).into()),
        );
        assert_eq!(req.to_string(), "torch==2.0.0");
        assert_eq!(Requirement::unconstrained("rich").to_string(), "rich");
    }
}
