//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: platform selection, CLI options and the config file
//! - SourceError: reading the core requirements file and extension manifests
//! - OutputError: reading and writing the merged artifact

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Requirement source related errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Output artifact related errors
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Platform identifier is not one of the supported set
    #[error("unsupported platform '{value}': expected 'windows', 'macosx' or 'linux'")]
    UnsupportedPlatform { value: String },

    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("invalid config file {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to requirement sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// Platform core requirements file not found
    #[error("core requirements file not found: {path}")]
    CoreNotFound { path: PathBuf },

    /// Failed to read the core requirements file
    #[error("failed to read core requirements file {path}: {source}")]
    CoreReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an extension manifest
    #[error("failed to read manifest {path}: {source}")]
    ManifestReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("failed to parse YAML in {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Manifest parsed but has an unexpected shape
    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// Failed to list the extensions directory
    #[error("failed to list extensions directory {path}: {source}")]
    ExtensionsDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the merged output artifact
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to create the output directory
    #[error("failed to create output directory {path}: {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file
    #[error("failed to write output file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the existing output file
    #[error("failed to read existing output file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new UnsupportedPlatform error
    pub fn unsupported_platform(value: impl Into<String>) -> Self {
        ConfigError::UnsupportedPlatform {
            value: value.into(),
        }
    }

    /// Creates a new InvalidFile error
    pub fn invalid_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Creates a new CoreNotFound error
    pub fn core_not_found(path: impl Into<PathBuf>) -> Self {
        SourceError::CoreNotFound { path: path.into() }
    }

    /// Creates a new CoreReadError
    pub fn core_read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::CoreReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ManifestReadError
    pub fn manifest_read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::ManifestReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ManifestParseError
    pub fn manifest_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SourceError::ManifestParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidManifest error
    pub fn invalid_manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SourceError::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl OutputError {
    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::WriteError {
            path: path.into(),
            source,
        }
    }
}
