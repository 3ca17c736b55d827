//! The package name -> merged constraint mapping

use crate::domain::{normalize_name, Constraint, SourceLabel};
use std::collections::btree_map::{self, BTreeMap};

/// Merged state for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    /// Package name as first declared
    pub name: String,
    /// Merged constraint; `None` means unconstrained
    pub constraint: Option<Constraint>,
    /// Every source that declared the package, in merge order
    pub sources: Vec<SourceLabel>,
    /// Source whose declaration last changed `constraint`
    pub origin: SourceLabel,
}

impl AggregateEntry {
    /// Create an entry from a first declaration
    pub fn new(name: impl Into<String>, constraint: Option<Constraint>, source: SourceLabel) -> Self {
        Self {
            name: name.into(),
            constraint,
            sources: vec![source.clone()],
            origin: source,
        }
    }

    /// Record that `source` declared this package
    pub fn add_source(&mut self, source: &SourceLabel) {
        if !self.sources.contains(source) {
            self.sources.push(source.clone());
        }
    }

    /// Renders the output line: name followed by the formatted constraint
    pub fn requirement_line(&self) -> String {
        match self.constraint {
            Some(ref constraint) => format!("{}{}", self.name, constraint),
            None => self.name.clone(),
        }
    }
}

/// Mapping from normalized package name to merged entry, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyAggregate {
    entries: BTreeMap<String, AggregateEntry>,
}

impl DependencyAggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of packages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no package has been declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a package by any spelling of its name
    pub fn get(&self, name: &str) -> Option<&AggregateEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// Entries sorted by normalized name
    pub fn iter(&self) -> btree_map::Values<'_, String, AggregateEntry> {
        self.entries.values()
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut AggregateEntry> {
        self.entries.get_mut(key)
    }

    pub(crate) fn insert(&mut self, key: String, entry: AggregateEntry) {
        self.entries.insert(key, entry);
    }
}

impl<'a> IntoIterator for &'a DependencyAggregate {
    type Item = &'a AggregateEntry;
    type IntoIter = btree_map::Values<'a, String, AggregateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
