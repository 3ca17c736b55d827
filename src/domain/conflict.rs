//! Conflict and note records produced while merging

use super::{Constraint, SourceLabel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why two constraints could not be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The intervals have no version in common
    EmptyIntersection,
    /// Both sides are opaque literals and they differ
    OpaqueMismatch,
    /// The declaration contradicts itself, e.g. `>=3.0,<2.0`
    Unsatisfiable,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::EmptyIntersection => write!(f, "no version satisfies both"),
            ConflictKind::OpaqueMismatch => write!(f, "unparsed constraints differ"),
            ConflictKind::Unsatisfiable => write!(f, "no version satisfies it"),
        }
    }
}

/// A rejected update for one package
///
/// The stored constraint was left as it was before the incoming declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Package name as first declared
    pub package: String,
    /// Sources that contributed to the stored constraint
    pub existing_sources: Vec<SourceLabel>,
    /// The stored constraint that was kept; `None` if the package was unconstrained
    pub existing: Option<Constraint>,
    /// Source of the rejected declaration
    pub incoming_source: SourceLabel,
    /// The rejected constraint
    pub incoming: Constraint,
    /// Conflict classification
    pub kind: ConflictKind,
}

impl ConflictReport {
    /// Renders the contributing sources as a comma separated list
    pub fn existing_sources_display(&self) -> String {
        self.existing_sources
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders the kept constraint
    pub fn kept_display(&self) -> String {
        match self.existing {
            Some(ref constraint) => constraint.to_string(),
            None => "no constraint".to_string(),
        }
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ConflictKind::Unsatisfiable {
            return write!(
                f,
                "{}: {} from {} ({}); keeping {}",
                self.package,
                self.incoming,
                self.incoming_source,
                self.kind,
                self.kept_display()
            );
        }

        write!(
            f,
            "{}: {} from {} conflicts with {} from {} ({}); keeping {}",
            self.package,
            self.incoming,
            self.incoming_source,
            self.kept_display(),
            self.existing_sources_display(),
            self.kind,
            self.kept_display()
        )
    }
}

/// An opaque constraint that was dropped because a concrete one took precedence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeNote {
    /// Package name as first declared
    pub package: String,
    /// The discarded literal
    pub dropped: String,
    /// Source that declared the discarded literal
    pub dropped_source: SourceLabel,
    /// The concrete constraint that was kept
    pub kept: Constraint,
}

impl fmt::Display for MergeNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ignored unparsed constraint '{}' from {} in favour of {}",
            self.package, self.dropped, self.dropped_source, self.kept
        )
    }
}
