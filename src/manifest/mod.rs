//! Requirement sources
//!
//! This module provides functionality to:
//! - Read the platform core requirements file
//! - Discover extension directories in a stable order
//! - Parse and validate extension manifests
//! - Produce the ordered stream of tagged requirements for the merge

mod core_file;
mod detector;
mod extension;
mod loader;

pub use core_file::{load_core_requirements, parse_core_content, CoreRequirements};
pub use detector::{discover_extensions, ExtensionDir};
pub use extension::{ExtensionManifest, ServerSection};
pub use loader::{ExtensionLoad, ExtensionOutcome, ExtensionsScan, LoadedSources, SourceLoader};
