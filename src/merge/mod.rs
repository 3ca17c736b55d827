//! Merge engine folding tagged requirements into one aggregate
//!
//! This module provides:
//! - The per-package merge decision (intersect, keep, replace or conflict)
//! - A pure fold over the requirement stream that returns the aggregate,
//!   the conflict reports and the informational notes together
//!
//! Opaque precedence: a concrete range always wins over an opaque literal,
//! whichever side it is on, and the dropped literal is recorded as a note. Two
//! different opaque literals conflict and the stored one is kept.
//!
//! A range that no version satisfies (`>=3.0,<2.0`) is rejected on arrival with
//! an `Unsatisfiable` conflict. A first declaration like that still adds the
//! package, unconstrained.

mod aggregate;

pub use aggregate::{AggregateEntry, DependencyAggregate};

use crate::domain::{Constraint, ConflictKind, ConflictReport, MergeNote, TaggedRequirement};

/// Returns true for a range that no version satisfies
fn is_unsatisfiable(constraint: &Constraint) -> bool {
    matches!(constraint, Constraint::Range(range) if range.is_empty())
}

/// Result of merging a requirement stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged constraints by package
    pub aggregate: DependencyAggregate,
    /// Rejected updates, in the order they were encountered
    pub conflicts: Vec<ConflictReport>,
    /// Opaque literals dropped in favour of concrete ranges
    pub notes: Vec<MergeNote>,
}

/// How an incoming constraint combines with the stored one
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Store this constraint
    Set(Constraint),
    /// Stored constraint stays, nothing to report
    Unchanged,
    /// Stored range stays, incoming opaque literal is dropped
    DropIncoming(String),
    /// Stored opaque literal is replaced by the incoming range
    ReplaceOpaque(String, Constraint),
    /// Incoming constraint rejected
    Conflict(ConflictKind),
}

fn step(existing: Option<&Constraint>, incoming: Option<&Constraint>) -> Step {
    match (existing, incoming) {
        (_, None) => Step::Unchanged,
        (_, Some(c)) if is_unsatisfiable(c) => Step::Conflict(ConflictKind::Unsatisfiable),
        (None, Some(c)) => Step::Set(c.clone()),
        (Some(Constraint::Range(a)), Some(Constraint::Range(b))) => match a.intersect(b) {
            Ok(merged) => Step::Set(Constraint::Range(merged)),
            Err(_) => Step::Conflict(ConflictKind::EmptyIntersection),
        },
        (Some(Constraint::Opaque(a)), Some(Constraint::Opaque(b))) => {
            if a == b {
                Step::Unchanged
            } else {
                Step::Conflict(ConflictKind::OpaqueMismatch)
            }
        }
        (Some(Constraint::Range(_)), Some(Constraint::Opaque(literal))) => {
            Step::DropIncoming(literal.clone())
        }
        (Some(Constraint::Opaque(literal)), Some(range @ Constraint::Range(_))) => {
            Step::ReplaceOpaque(literal.clone(), range.clone())
        }
    }
}

impl MergeOutcome {
    /// Fold one tagged requirement into the outcome
    pub fn absorb(mut self, tagged: TaggedRequirement) -> Self {
        let key = tagged.requirement.key();
        let TaggedRequirement {
            source,
            requirement,
        } = tagged;

        let Some(entry) = self.aggregate.get_mut(&key) else {
            let constraint = match requirement.constraint {
                Some(incoming) if is_unsatisfiable(&incoming) => {
                    self.conflicts.push(ConflictReport {
                        package: requirement.name.clone(),
                        existing_sources: Vec::new(),
                        existing: None,
                        incoming_source: source.clone(),
                        incoming,
                        kind: ConflictKind::Unsatisfiable,
                    });
                    None
                }
                other => other,
            };
            let entry = AggregateEntry::new(requirement.name, constraint, source);
            self.aggregate.insert(key, entry);
            return self;
        };

        match step(entry.constraint.as_ref(), requirement.constraint.as_ref()) {
            Step::Set(constraint) => {
                entry.constraint = Some(constraint);
                entry.origin = source.clone();
                entry.add_source(&source);
            }
            Step::Unchanged => entry.add_source(&source),
            Step::DropIncoming(literal) => {
                if let Some(ref kept) = entry.constraint {
                    self.notes.push(MergeNote {
                        package: entry.name.clone(),
                        dropped: literal,
                        dropped_source: source.clone(),
                        kept: kept.clone(),
                    });
                }
                entry.add_source(&source);
            }
            Step::ReplaceOpaque(literal, range) => {
                self.notes.push(MergeNote {
                    package: entry.name.clone(),
                    dropped: literal,
                    dropped_source: entry.origin.clone(),
                    kept: range.clone(),
                });
                entry.constraint = Some(range);
                entry.origin = source.clone();
                entry.add_source(&source);
            }
            Step::Conflict(kind) => {
                if let Some(incoming) = requirement.constraint {
                    self.conflicts.push(ConflictReport {
                        package: entry.name.clone(),
                        existing_sources: entry.sources.clone(),
                        existing: entry.constraint.clone(),
                        incoming_source: source,
                        incoming,
                        kind,
                    });
                }
            }
        }

        self
    }

    /// Returns true if any update was rejected
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Merge a stream of tagged requirements in order
pub fn merge<I>(stream: I) -> MergeOutcome
where
    I: IntoIterator<Item = TaggedRequirement>,
{
    stream
        .into_iter()
        .fold(MergeOutcome::default(), MergeOutcome::absorb)
}
