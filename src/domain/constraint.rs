//! Version constraints as intervals over semantic versions
//!
//! A constraint is either a `Range` (optional lower and upper bound, each
//! inclusive or exclusive) or an `Opaque` literal that could not be decomposed
//! into bounds. Only ranges take part in intersection.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// One end of a version interval
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bound {
    /// The boundary version
    pub version: Version,
    /// Whether the boundary version itself is allowed
    pub inclusive: bool,
}

impl Bound {
    /// Creates an inclusive bound
    pub fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    /// Creates an exclusive bound
    pub fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

/// An interval of acceptable versions
///
/// Both bounds absent means "any version".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionConstraint {
    /// Lower bound
    pub min: Option<Bound>,
    /// Upper bound
    pub max: Option<Bound>,
}

/// Two constraints have no version in common
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("incompatible version constraints: {left} and {right}")]
pub struct IncompatibleConstraints {
    pub left: VersionConstraint,
    pub right: VersionConstraint,
}

impl VersionConstraint {
    /// Matches any version
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// `>=version`
    pub fn at_least(version: Version) -> Self {
        Self {
            min: Some(Bound::inclusive(version)),
            max: None,
        }
    }

    /// `>version`
    pub fn greater_than(version: Version) -> Self {
        Self {
            min: Some(Bound::exclusive(version)),
            max: None,
        }
    }

    /// `<=version`
    pub fn at_most(version: Version) -> Self {
        Self {
            min: None,
            max: Some(Bound::inclusive(version)),
        }
    }

    /// `<version`
    pub fn less_than(version: Version) -> Self {
        Self {
            min: None,
            max: Some(Bound::exclusive(version)),
        }
    }

    /// `==version`
    pub fn exact(version: Version) -> Self {
        Self {
            min: Some(Bound::inclusive(version.clone())),
            max: Some(Bound::inclusive(version)),
        }
    }

    /// `>=min,<max`, the shape produced by caret and tilde ranges
    pub fn half_open(min: Version, max: Version) -> Self {
        Self {
            min: Some(Bound::inclusive(min)),
            max: Some(Bound::exclusive(max)),
        }
    }

    /// Returns the pinned version if this constraint allows exactly one version
    ///
    /// Build metadata does not count, so `>=1.0.0+cpu,<=1.0.0` is a pin on
    /// `1.0.0+cpu`.
    pub fn exact_version(&self) -> Option<&Version> {
        match (&self.min, &self.max) {
            (Some(min), Some(max))
                if min.inclusive
                    && max.inclusive
                    && min.version.cmp_precedence(&max.version) == Ordering::Equal =>
            {
                Some(&tie_winner(min, max).version)
            }
            _ => None,
        }
    }

    /// Returns true if no version can satisfy this constraint
    pub fn is_empty(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => match min.version.cmp_precedence(&max.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(min.inclusive && max.inclusive),
                Ordering::Less => false,
            },
            _ => false,
        }
    }

    /// Returns true if `version` lies inside the interval
    pub fn contains(&self, version: &Version) -> bool {
        let above_min = match &self.min {
            None => true,
            Some(b) => match version.cmp_precedence(&b.version) {
                Ordering::Greater => true,
                Ordering::Equal => b.inclusive,
                Ordering::Less => false,
            },
        };
        let below_max = match &self.max {
            None => true,
            Some(b) => match version.cmp_precedence(&b.version) {
                Ordering::Less => true,
                Ordering::Equal => b.inclusive,
                Ordering::Greater => false,
            },
        };
        above_min && below_max
    }

    /// Takes the tighter bound on each side without checking the result
    ///
    /// The lower bound is the larger of the two minimums and the upper bound the
    /// smaller of the two maximums. Versions are ordered by semver precedence,
    /// so build metadata never decides a bound. On a tie the bound stays
    /// inclusive only if both sides are inclusive, and a build-tagged version is
    /// kept over an untagged one (`self` wins between two tags).
    pub fn narrow(&self, other: &VersionConstraint) -> Self {
        VersionConstraint {
            min: tighter_min(self.min.as_ref(), other.min.as_ref()),
            max: tighter_max(self.max.as_ref(), other.max.as_ref()),
        }
    }

    /// Intersects two intervals
    ///
    /// Same as [`VersionConstraint::narrow`], but an empty result is an error
    /// carrying both inputs.
    pub fn intersect(&self, other: &VersionConstraint) -> Result<Self, IncompatibleConstraints> {
        let merged = self.narrow(other);

        if merged.is_empty() {
            return Err(IncompatibleConstraints {
                left: self.clone(),
                right: other.clone(),
            });
        }

        Ok(merged)
    }
}

// Between two precedence-equal bounds the one carrying build metadata wins
fn tie_winner<'a>(x: &'a Bound, y: &'a Bound) -> &'a Bound {
    if x.version.build.is_empty() && !y.version.build.is_empty() {
        y
    } else {
        x
    }
}

fn tie(x: &Bound, y: &Bound) -> Bound {
    Bound {
        version: tie_winner(x, y).version.clone(),
        inclusive: x.inclusive && y.inclusive,
    }
}

fn tighter_min(a: Option<&Bound>, b: Option<&Bound>) -> Option<Bound> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => Some(match x.version.cmp_precedence(&y.version) {
            Ordering::Greater => x.clone(),
            Ordering::Less => y.clone(),
            Ordering::Equal => tie(x, y),
        }),
    }
}

fn tighter_max(a: Option<&Bound>, b: Option<&Bound>) -> Option<Bound> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => Some(match x.version.cmp_precedence(&y.version) {
            Ordering::Less => x.clone(),
            Ordering::Greater => y.clone(),
            Ordering::Equal => tie(x, y),
        }),
    }
}

/// Intersects two optional ranges; an absent side is the identity
pub fn intersect(
    a: Option<&VersionConstraint>,
    b: Option<&VersionConstraint>,
) -> Result<Option<VersionConstraint>, IncompatibleConstraints> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(x), None) | (None, Some(x)) => Ok(Some(x.clone())),
        (Some(x), Some(y)) => x.intersect(y).map(Some),
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(version) = self.exact_version() {
            return write!(f, "=={}", version);
        }

        let mut parts = Vec::with_capacity(2);
        if let Some(ref min) = self.min {
            let op = if min.inclusive { ">=" } else { ">" };
            parts.push(format!("{}{}", op, min.version));
        }
        if let Some(ref max) = self.max {
            let op = if max.inclusive { "<=" } else { "<" };
            parts.push(format!("{}{}", op, max.version));
        }

        write!(f, "{}", parts.join(","))
    }
}

/// A parsed constraint: either an interval or a literal carried through as-is
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    /// Decomposed into bounds
    Range(VersionConstraint),
    /// Unrecognized syntax, kept verbatim
    Opaque(String),
}

impl Constraint {
    /// Returns true for the opaque variant
    pub fn is_opaque(&self) -> bool {
        matches!(self, Constraint::Opaque(_))
    }
}

impl From<VersionConstraint> for Constraint {
    fn from(range: VersionConstraint) -> Self {
        Constraint::Range(range)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Range(range) => write!(f, "{}", range),
            Constraint::Opaque(raw) => write!(f, "{}", raw),
        }
    }
}
