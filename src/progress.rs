//! Terminal progress feedback
//!
//! Spinner for indeterminate steps and a bar for the per-dependency loop.
//! Disabled in quiet and JSON modes so nothing but the report reaches stdout.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Progress reporter for plan and apply runs
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Show a spinner for an indeterminate step
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars(TICK_CHARS)
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        self.replace(spinner, message, 80);
    }

    /// Start a bar over `total` dependencies
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled || total == 0 {
            return;
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("Invalid template")
                .tick_chars(TICK_CHARS)
                .progress_chars("█▓▒░"),
        );
        self.replace(bar, message, 100);
    }

    fn replace(&mut self, bar: ProgressBar, message: &str, tick_ms: u64) {
        if let Some(previous) = self.bar.take() {
            previous.finish_and_clear();
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(tick_ms));
        self.bar = Some(bar);
    }

    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish and clear the current spinner or bar
    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        assert!(!progress.is_enabled());
        progress.spinner("Detecting");
        progress.start(10, "Checking");
        progress.inc();
        progress.set_message("aws");
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Checking dependencies");
        assert!(progress.bar.is_some());
        progress.inc();
        progress.set_message("Checking aws");
        progress.spinner("Writing updates...");
        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_empty_bar_is_not_shown() {
        let mut progress = Progress::new(true);
        progress.start(0, "Checking dependencies");
        assert!(progress.bar.is_none());
    }
}
