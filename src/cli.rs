//! CLI argument parsing module for reqmerge

use clap::Parser;
use std::path::PathBuf;

/// Merge core and extension requirement declarations
#[derive(Parser, Debug, Clone)]
#[command(
    name = "reqmerge",
    about = "Merge platform and extension requirements into one conflict-checked file"
)]
pub struct CliArgs {
    /// Invocation root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print version information
    #[arg(short = 'V', long = "version")]
    pub print_version: bool,

    // Source selection
    /// Platform whose core requirements file is used (windows, macosx, linux)
    #[arg(long)]
    pub platform: Option<String>,

    /// Core requirements file (overrides the platform default)
    #[arg(long, value_name = "PATH")]
    pub core_file: Option<PathBuf>,

    /// Directory containing one subdirectory per extension
    #[arg(long, value_name = "PATH")]
    pub extensions_dir: Option<PathBuf>,

    /// Manifest filename inside each extension directory
    #[arg(long, value_name = "NAME")]
    pub manifest_name: Option<String>,

    /// Output requirements file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // Modes
    /// Dry run mode - print the merged file instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Exit with status 2 if the output file is missing or out of date
    #[arg(long)]
    pub check: bool,

    // Output options
    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show changes to the output file in diff format
    #[arg(long)]
    pub diff: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["reqmerge"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.print_version);
        assert!(args.platform.is_none());
        assert!(args.core_file.is_none());
        assert!(args.extensions_dir.is_none());
        assert!(args.manifest_name.is_none());
        assert!(args.output.is_none());
        assert!(!args.dry_run);
        assert!(!args.check);
        assert!(!args.json);
        assert!(!args.diff);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.no_color);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["reqmerge", "/some/path"]);
        assert_eq!(args.path, PathBuf::from("/some/path"));
    }

    #[test]
    fn test_dry_run_flags() {
        assert!(CliArgs::parse_from(["reqmerge", "-n"]).dry_run);
        assert!(CliArgs::parse_from(["reqmerge", "--dry-run"]).dry_run);
    }

    #[test]
    fn test_quiet_flags() {
        assert!(CliArgs::parse_from(["reqmerge", "-q"]).quiet);
        assert!(CliArgs::parse_from(["reqmerge", "--quiet"]).quiet);
    }

    #[test]
    fn test_no_color_flag() {
        assert!(CliArgs::parse_from(["reqmerge", "--no-color"]).no_color);
    }

    #[test]
    fn test_version_flags() {
        assert!(CliArgs::parse_from(["reqmerge", "-V"]).print_version);
        assert!(CliArgs::parse_from(["reqmerge", "--version"]).print_version);
    }

    #[test]
    fn test_path_overrides() {
        let args = CliArgs::parse_from([
            "reqmerge",
            "--core-file",
            "deps/core.txt",
            "--extensions-dir",
            "plugins",
            "--manifest-name",
            "plugin.yaml",
            "-o",
            "out/requirements.txt",
        ]);
        assert_eq!(args.core_file, Some(PathBuf::from("deps/core.txt")));
        assert_eq!(args.extensions_dir, Some(PathBuf::from("plugins")));
        assert_eq!(args.manifest_name.as_deref(), Some("plugin.yaml"));
        assert_eq!(args.output, Some(PathBuf::from("out/requirements.txt")));
    }

    #[test]
    fn test_platform_is_free_text() {
        // Validation happens during config resolution so it can exit with status 1
        let args = CliArgs::parse_from(["reqmerge", "--platform", "plan9"]);
        assert_eq!(args.platform.as_deref(), Some("plan9"));
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "reqmerge",
            "/path/to/project",
            "--platform",
            "linux",
            "--check",
            "--json",
            "--verbose",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/project"));
        assert_eq!(args.platform.as_deref(), Some("linux"));
        assert!(args.check);
        assert!(args.json);
        assert!(args.verbose);
        assert!(!args.diff);
    }
}
