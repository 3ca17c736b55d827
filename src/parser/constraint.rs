//! Constraint token parser
//!
//! Handles constraint formats:
//! - Caret: `^1.2.3` (next major, exclusive)
//! - Tilde: `~1.2.3` (next minor, exclusive)
//! - Compatible release: `~=1.2` or `~=1.2.3` (PEP 440)
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Exact: `==1.2.3`, `=1.2.3`, `1.2.3`
//! - Lists: `>=1.20,<2.0` (parts that cannot overlap give an empty range)
//!
//! Anything else (`!=`, `===`, wildcards) is kept as an opaque literal.

use crate::domain::{Constraint, VersionConstraint};
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use std::sync::LazyLock;

// Loose versions: up to three numeric components, optional `v` prefix and a
// pre-release tag glued on the PEP 440 way (`2.0rc1`, `1.0.0-beta.2`)
static LOOSE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[-.]?((?:a|b|c|rc|alpha|beta|pre|preview|dev)(?:\.?\d+)*))?$",
    )
    .unwrap()
});

/// Parses an optional constraint token
///
/// An absent or blank token means "no restriction" and yields `None`.
pub fn parse_constraint(token: Option<&str>) -> Option<Constraint> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }
    Some(parse_constraint_str(token))
}

/// Parses a non-empty constraint token, falling back to an opaque literal
pub fn parse_constraint_str(token: &str) -> Constraint {
    let token = token.trim();
    let range = if token.contains(',') {
        parse_list(token)
    } else {
        parse_single(token)
    };

    match range {
        Some(range) => Constraint::Range(range),
        None => Constraint::Opaque(token.to_string()),
    }
}

// Every part must parse. Parts that do not overlap still give a range, an
// empty one, which the merge reports as unsatisfiable.
fn parse_list(token: &str) -> Option<VersionConstraint> {
    token
        .split(',')
        .map(str::trim)
        .try_fold(VersionConstraint::unconstrained(), |acc, part| {
            if part.is_empty() {
                return None;
            }
            Some(acc.narrow(&parse_single(part)?))
        })
}

fn parse_single(token: &str) -> Option<VersionConstraint> {
    if let Some(rest) = token.strip_prefix("~=") {
        return compatible_release(rest.trim());
    }
    if let Some(rest) = token.strip_prefix('^') {
        let version = parse_version(rest.trim())?;
        let upper = Version::new(version.major.checked_add(1)?, 0, 0);
        return Some(VersionConstraint::half_open(version, upper));
    }
    if let Some(rest) = token.strip_prefix('~') {
        let version = parse_version(rest.trim())?;
        let upper = Version::new(version.major, version.minor.checked_add(1)?, 0);
        return Some(VersionConstraint::half_open(version, upper));
    }
    if let Some(rest) = token.strip_prefix(">=") {
        return parse_version(rest.trim()).map(VersionConstraint::at_least);
    }
    if let Some(rest) = token.strip_prefix('>') {
        return parse_version(rest.trim()).map(VersionConstraint::greater_than);
    }
    if let Some(rest) = token.strip_prefix("<=") {
        return parse_version(rest.trim()).map(VersionConstraint::at_most);
    }
    if let Some(rest) = token.strip_prefix('<') {
        return parse_version(rest.trim()).map(VersionConstraint::less_than);
    }
    if let Some(rest) = token.strip_prefix("==") {
        return parse_version(rest.trim()).map(VersionConstraint::exact);
    }
    if let Some(rest) = token.strip_prefix('=') {
        return parse_version(rest.trim()).map(VersionConstraint::exact);
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_version(token).map(VersionConstraint::exact);
    }
    None
}

// ~=X.Y means >=X.Y,<(X+1).0 and ~=X.Y.Z means >=X.Y.Z,<X.(Y+1).0
fn compatible_release(rest: &str) -> Option<VersionConstraint> {
    let (version, components) = coerce_version(rest)?;
    let upper = match components {
        2 => Version::new(version.major.checked_add(1)?, 0, 0),
        3 => Version::new(version.major, version.minor.checked_add(1)?, 0),
        _ => return None,
    };
    Some(VersionConstraint::half_open(version, upper))
}

/// Parses a version, padding missing minor/patch components with zeros
pub fn parse_version(s: &str) -> Option<Version> {
    coerce_version(s).map(|(version, _)| version)
}

// Returns the version and how many numeric components were written
fn coerce_version(s: &str) -> Option<(Version, usize)> {
    let s = s.trim();
    let unprefixed = s.strip_prefix('v').unwrap_or(s);
    if let Ok(version) = Version::parse(unprefixed) {
        return Some((version, 3));
    }

    let caps = LOOSE_VERSION_RE.captures(s)?;
    let component = |idx: usize| -> Option<Option<u64>> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok().map(Some),
            None => Some(None),
        }
    };

    let major = component(1)??;
    let minor = component(2)?;
    let patch = component(3)?;
    let components = 1 + usize::from(minor.is_some()) + usize::from(patch.is_some());

    let pre = match caps.get(4) {
        Some(m) => Prerelease::new(m.as_str()).ok()?,
        None => Prerelease::EMPTY,
    };

    let version = Version {
        major,
        minor: minor.unwrap_or(0),
        patch: patch.unwrap_or(0),
        pre,
        build: BuildMetadata::EMPTY,
    };
    Some((version, components))
}
