//! Core domain models for reqmerge
//!
//! This module contains the fundamental types used throughout the application:
//! - Platform identifiers selecting the core requirements file
//! - Version constraints as intervals with intersection and formatting
//! - Requirement declarations and their merge keys
//! - Source labels for diagnostics
//! - Conflict reports and merge notes

mod conflict;
mod constraint;
mod platform;
mod requirement;
mod source;

pub use conflict::{ConflictKind, ConflictReport, MergeNote};
pub use constraint::{intersect, Bound, Constraint, IncompatibleConstraints, VersionConstraint};
pub use platform::Platform;
pub use requirement::{normalize_name, Requirement, TaggedRequirement};
pub use source::SourceLabel;
