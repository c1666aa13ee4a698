use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;

use crate::api::LawSummary;

/// Progress bar over the laws of one download run
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Create a progress indicator; it stays silent in quiet mode or when
    /// stderr is not a terminal
    pub fn new(quiet: bool) -> Self {
        let enabled = !quiet && io::stderr().is_terminal();
        Self {
            bar: enabled.then(ProgressBar::new_spinner),
        }
    }

    /// A progress indicator that never draws
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    /// Show a spinner while the law list is fetched
    pub fn listing(&self, category_cd: &str) {
        if let Some(ref pb) = self.bar {
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(messages::listing(category_cd));
            pb.enable_steady_tick(Duration::from_millis(100));
        }
    }

    /// Switch to a bar over `total` laws
    pub fn start(&self, total: usize) {
        if let Some(ref pb) = self.bar {
            pb.disable_steady_tick();
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓░"),
            );
            pb.set_length(total as u64);
            pb.set_position(0);
        }
    }

    /// Announce the law currently being fetched
    pub fn law(&self, summary: &LawSummary) {
        if let Some(ref pb) = self.bar {
            pb.set_message(summary.label().to_string());
        }
    }

    pub fn inc(&self) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

/// Progress messages
pub mod messages {
    pub fn listing(category_cd: &str) -> String {
        format!("Fetching law list (category {})...", category_cd)
    }
}
