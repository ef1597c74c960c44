//! Progress display for index lookups
//!
//! Visual feedback while packages are being checked, using indicatif.
//! Disabled in boring mode and whenever output is not a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress reporter for the check loop
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a progress bar over the given number of packages
    pub fn start(enabled: bool, total: u64) -> Self {
        if !enabled || total == 0 {
            return Self::disabled();
        }

        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("progress template is valid")
                .progress_chars("█▓▒░"),
        );
        bar.set_message("Checking requirements");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self { bar: None }
    }

    /// Show which package is being looked up
    pub fn set_package(&self, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("Checking {}", name));
        }
    }

    /// Advance by one package
    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Remove the bar from the terminal
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
