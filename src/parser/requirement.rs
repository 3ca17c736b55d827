//! Declaration line parsing strategies
//!
//! A declaration is decomposed by the first strategy that accepts it:
//! 1. `PrimaryGrammar`: `name[extras]<op>version[,<op>version...]`
//! 2. `WhitespaceSplit`: first token is the name, the rest is a raw constraint
//! 3. `Identity`: the whole line is the name, always succeeds

use crate::parser::ParseStrategy;
use regex::Regex;
use std::sync::LazyLock;

// Name token followed by an optional constraint list. Each list item is up to two
// operator characters and a version-ish token.
static PRIMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9._\-\[\]]+)\s*((?:[<>=!~^]{0,2}\s*[0-9A-Za-z.*+\-]+)(?:\s*,\s*[<>=!~^]{0,2}\s*[0-9A-Za-z.*+\-]+)*)?$",
    )
    .unwrap()
});

/// Which strategy produced a `RawRequirement`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Matched the declaration grammar
    Primary,
    /// Split on whitespace
    WhitespaceSplit,
    /// Took the whole line as the name
    Identity,
}

impl StrategyKind {
    /// Returns true if the line needed a fallback strategy
    pub fn is_fallback(&self) -> bool {
        !matches!(self, StrategyKind::Primary)
    }
}

/// Name and raw constraint token before constraint parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequirement {
    /// Package name token
    pub name: String,
    /// Constraint token, if any
    pub constraint: Option<String>,
}

impl RawRequirement {
    fn new(name: &str, constraint: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            constraint: constraint
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

/// Matches `name<constraint>` declarations
pub struct PrimaryGrammar;

impl ParseStrategy for PrimaryGrammar {
    fn parse(&self, line: &str) -> Option<RawRequirement> {
        let caps = PRIMARY_RE.captures(line)?;
        let name = caps.get(1)?.as_str();
        let constraint = caps.get(2).map(|m| m.as_str());
        Some(RawRequirement::new(name, constraint))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Primary
    }
}

/// Splits on whitespace: first token is the name, the rest is the constraint
pub struct WhitespaceSplit;

impl ParseStrategy for WhitespaceSplit {
    fn parse(&self, line: &str) -> Option<RawRequirement> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let rest: Vec<&str> = parts.collect();
        if rest.is_empty() {
            return None;
        }
        Some(RawRequirement::new(name, Some(&rest.join(" "))))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::WhitespaceSplit
    }
}

/// Uses the whole trimmed line as the package name
pub struct Identity;

impl ParseStrategy for Identity {
    fn parse(&self, line: &str) -> Option<RawRequirement> {
        Some(RawRequirement::new(line, None))
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, constraint: Option<&str>) -> RawRequirement {
        RawRequirement {
            name: name.to_string(),
            constraint: constraint.map(str::to_string),
        }
    }

    #[test]
    fn test_primary_name_only() {
        assert_eq!(PrimaryGrammar.parse("numpy"), Some(raw("numpy", None)));
    }

    #[test]
    fn test_primary_operators() {
        assert_eq!(
            PrimaryGrammar.parse("torch==2.0.0"),
            Some(raw("torch", Some("==2.0.0")))
        );
        assert_eq!(
            PrimaryGrammar.parse("numpy^1.22.0"),
            Some(raw("numpy", Some("^1.22.0")))
        );
        assert_eq!(
            PrimaryGrammar.parse("requests >= 2.28"),
            Some(raw("requests", Some(">= 2.28")))
        );
        assert_eq!(
            PrimaryGrammar.parse("diffusers~=0.21"),
            Some(raw("diffusers", Some("~=0.21")))
        );
    }

    #[test]
    fn test_primary_bare_version() {
        assert_eq!(
            PrimaryGrammar.parse("pillow 10.0.0"),
            Some(raw("pillow", Some("10.0.0")))
        );
    }

    #[test]
    fn test_primary_extras() {
        assert_eq!(
            PrimaryGrammar.parse("uvicorn[standard]>=0.23.0"),
            Some(raw("uvicorn[standard]", Some(">=0.23.0")))
        );
    }

    #[test]
    fn test_primary_list() {
        assert_eq!(
            PrimaryGrammar.parse("numpy>=1.20,<2.0"),
            Some(raw("numpy", Some(">=1.20,<2.0")))
        );
        assert_eq!(
            PrimaryGrammar.parse("numpy >=1.20, <2.0"),
            Some(raw("numpy", Some(">=1.20, <2.0")))
        );
    }

    #[test]
    fn test_primary_rejects_markers() {
        assert_eq!(
            PrimaryGrammar.parse("pywin32>=306 ; sys_platform == 'win32'"),
            None
        );
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(
            WhitespaceSplit.parse("pywin32>=306 ; sys_platform == 'win32'"),
            Some(raw("pywin32>=306", Some("; sys_platform == 'win32'")))
        );
        assert_eq!(WhitespaceSplit.parse("single"), None);
    }

    #[test]
    fn test_identity_always_succeeds() {
        assert_eq!(Identity.parse("  weird@@line  "), Some(raw("weird@@line", None)));
        assert_eq!(Identity.parse(""), Some(raw("", None)));
    }

    #[test]
    fn test_strategy_kind() {
        assert!(!PrimaryGrammar.kind().is_fallback());
        assert!(WhitespaceSplit.kind().is_fallback());
        assert!(Identity.kind().is_fallback());
    }
}
