//! Platform identifiers used to select the core requirements file

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported host platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Microsoft Windows
    Windows,
    /// Apple macOS
    Macosx,
    /// Linux distributions
    Linux,
}

impl Platform {
    /// Returns the identifier used in file names and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macosx => "macosx",
            Platform::Linux => "linux",
        }
    }

    /// Returns the core requirements filename for this platform
    pub fn requirements_filename(&self) -> String {
        format!("requirements-{}.txt", self.id())
    }

    /// Returns the display name for this platform
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Macosx => "macOS",
            Platform::Linux => "Linux",
        }
    }

    /// Maps an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Result<Self, ConfigError> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::Macosx),
            "linux" => Ok(Platform::Linux),
            other => Err(ConfigError::unsupported_platform(other)),
        }
    }

    /// Detects the platform this binary is running on
    pub fn detect() -> Result<Self, ConfigError> {
        Self::from_os(std::env::consts::OS)
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" => Ok(Platform::Windows),
            "macosx" | "macos" | "darwin" => Ok(Platform::Macosx),
            "linux" => Ok(Platform::Linux),
            _ => Err(ConfigError::unsupported_platform(s)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_filename() {
        assert_eq!(
            Platform::Windows.requirements_filename(),
            "requirements-windows.txt"
        );
        assert_eq!(
            Platform::Macosx.requirements_filename(),
            "requirements-macosx.txt"
        );
        assert_eq!(
            Platform::Linux.requirements_filename(),
            "requirements-linux.txt"
        );
    }

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("windows").unwrap(), Platform::Windows);
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::Macosx);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
    }

    #[test]
    fn test_from_os_unsupported() {
        let err = Platform::from_os("freebsd").unwrap_err();
        assert!(err.to_string().contains("freebsd"));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::Macosx);
        assert_eq!("MacOSX".parse::<Platform>().unwrap(), Platform::Macosx);
        assert_eq!(" linux ".parse::<Platform>().unwrap(), Platform::Linux);
        assert!("solaris".parse::<Platform>().is_err());
    }

    #[test]
    fn test_detect_matches_host() {
        // Every CI target we build for is one of the supported three
        let platform = Platform::detect().unwrap();
        assert_eq!(platform.id().parse::<Platform>().unwrap(), platform);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Platform::Macosx), "macosx");
        assert_eq!(Platform::Macosx.display_name(), "macOS");
    }

    #[test]
    fn test_serde_platform() {
        let json = serde_json::to_string(&Platform::Linux).unwrap();
        assert_eq!(json, "\"linux\"");
        let parsed: Platform = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Platform::Linux);
    }
}
