//! Progress display on stderr while extensions are scanned and merged
//!
//! Uses indicatif. The orchestrator disables it in quiet mode and for JSON
//! output, in which case every call is a no-op.

use crate::manifest::ExtensionOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for one merge run
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
    /// Extensions skipped so far in the current scan
    skipped: usize,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: None,
            skipped: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a bar over `total` extension directories
    ///
    /// Nothing is shown for an empty extensions directory.
    pub fn begin_scan(&mut self, total: usize) {
        self.skipped = 0;
        if !self.enabled || total == 0 {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} Scanning extensions [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Name the extension being read
    pub fn scanning(&self, extension: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(self.scan_message(extension));
        }
    }

    /// Count one extension as done
    pub fn scanned(&mut self, extension: &str, outcome: &ExtensionOutcome) {
        if !matches!(outcome, ExtensionOutcome::Loaded { .. }) {
            self.skipped += 1;
        }
        if let Some(ref bar) = self.bar {
            bar.set_message(self.scan_message(extension));
            bar.inc(1);
        }
    }

    fn scan_message(&self, extension: &str) -> String {
        match self.skipped {
            0 => extension.to_string(),
            n => format!("{} ({} skipped)", extension, n),
        }
    }

    /// Replace the scan bar with a spinner while `declarations` are folded
    pub fn begin_merge(&mut self, declarations: usize) {
        self.finish();
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Merging {} declaration(s)...", declarations));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Clear whatever is shown
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}
