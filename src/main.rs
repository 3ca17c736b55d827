//! reqmerge - requirements merger CLI tool
//!
//! Combines the core requirements file for the current platform with the
//! dependencies declared by every extension manifest and writes the result
//! to `.venv/requirements.txt`.

use clap::Parser;
use reqmerge::cli::CliArgs;
use reqmerge::config::MergeConfig;
use reqmerge::logging;
use reqmerge::orchestrator::Orchestrator;
use reqmerge::output::{create_formatter, OutputConfig};
use reqmerge::writer::WriteMode;
use std::io::{self, Write};
use std::process::ExitCode;

/// Exit code when `--check` finds the output out of date
const EXIT_STALE: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Handle version flag
    if args.print_version {
        println!("reqmerge {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init(args.verbose, args.quiet) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    // Run the main logic and handle errors
    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = MergeConfig::from_cli(&args)?;

    let mode = if args.check {
        WriteMode::Check
    } else if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };

    tracing::debug!(
        "reqmerge v{} on {} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.root.display(),
        mode
    );

    let output_config = OutputConfig::from_cli(
        args.json,
        args.diff,
        args.verbose,
        args.quiet,
        args.no_color,
    );
    let orchestrator = Orchestrator::new(config, mode);
    let result = orchestrator.run_with_progress(output_config.show_progress())?;

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.is_stale() {
        Ok(ExitCode::from(EXIT_STALE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
