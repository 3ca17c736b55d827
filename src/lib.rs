//! reqmerge - requirements merger library
//!
//! This library merges a platform-specific core requirements file with the
//! dependency declarations of installed extensions into one conflict-checked
//! requirements file:
//! - Version constraints are intersected as ranges
//! - Conflicting declarations are reported, never fatal
//! - The output is sorted and byte-for-byte reproducible

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod merge;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod writer;
