//! Sequential bulk download: one list request, then for each law a detail
//! request (with the law number fallback) and a file write, paced by a
//! [`Throttle`].

pub mod detail;
pub mod throttle;

pub use detail::fetch_detail;
pub use throttle::{FixedDelay, Throttle};

use log::{info, warn};
use std::path::PathBuf;

use crate::api::{LawSource, LawSummary, LookupKey};
use crate::config::DownloadConfig;
use crate::error::{Result, TaxlawError};
use crate::output::{ensure_output_dir, write_law};
use crate::progress::DownloadProgress;

/// What happened to one law
#[derive(Debug)]
pub enum LawOutcome {
    Saved { path: PathBuf, lookup: LookupKey },
    Failed { error: TaxlawError },
}

impl LawOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// One processed law and its outcome
#[derive(Debug)]
pub struct LawRecord {
    pub summary: LawSummary,
    pub outcome: LawOutcome,
}

/// Result of a whole run, in processing order
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub records: Vec<LawRecord>,
    /// List entries dropped for lacking a law ID
    pub dropped: usize,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn saved(&self) -> impl Iterator<Item = &LawRecord> {
        self.records.iter().filter(|r| r.outcome.is_saved())
    }

    pub fn failed(&self) -> impl Iterator<Item = &LawRecord> {
        self.records.iter().filter(|r| !r.outcome.is_saved())
    }

    pub fn saved_count(&self) -> usize {
        self.saved().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Laws that were only found through their law number
    pub fn fallback_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    LawOutcome::Saved {
                        lookup: LookupKey::LawNum,
                        ..
                    }
                )
            })
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Drives a download run against a [`LawSource`]
pub struct Downloader<S, T> {
    source: S,
    throttle: T,
    config: DownloadConfig,
    progress: DownloadProgress,
}

impl<S: LawSource, T: Throttle> Downloader<S, T> {
    pub fn new(source: S, throttle: T, config: DownloadConfig) -> Self {
        Self {
            source,
            throttle,
            config,
            progress: DownloadProgress::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: DownloadProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Run the download. Only output directory creation and the list request
    /// can fail the run; per-law failures end up in the report.
    pub async fn run(&self) -> Result<DownloadReport> {
        ensure_output_dir(&self.config.output_dir)?;

        info!(
            "Fetching law list for category {} from {}",
            self.config.category_cd,
            self.source.base_url()
        );
        self.progress.listing(&self.config.category_cd);
        let list = self.source.list_laws(&self.config.category_cd).await?;

        let mut laws = list.laws;
        if let Some(limit) = self.config.limit {
            laws.truncate(limit);
        }

        info!(
            "Downloading {} of {} laws into {}",
            laws.len(),
            list.total_count.map_or_else(|| "?".to_string(), |n| n.to_string()),
            self.config.output_dir.display()
        );
        self.progress.start(laws.len());

        let mut report = DownloadReport {
            records: Vec::with_capacity(laws.len()),
            dropped: list.dropped,
        };

        for (index, summary) in laws.into_iter().enumerate() {
            if index > 0 {
                self.throttle.pause().await;
            }

            self.progress.law(&summary);
            let outcome = self.process(&summary).await;
            match &outcome {
                LawOutcome::Saved { path, .. } => info!("Saved {}", path.display()),
                LawOutcome::Failed { error } => {
                    warn!("Failed to download {} ({}): {}", summary.law_id, summary.label(), error)
                }
            }
            self.progress.inc();

            report.records.push(LawRecord { summary, outcome });
        }

        self.progress.finish();
        Ok(report)
    }

    async fn process(&self, summary: &LawSummary) -> LawOutcome {
        let detail = match fetch_detail(&self.source, summary).await {
            Ok(detail) => detail,
            Err(error) => return LawOutcome::Failed { error },
        };

        match write_law(&self.config.output_dir, summary, &detail) {
            Ok(path) => LawOutcome::Saved {
                path,
                lookup: detail.lookup,
            },
            Err(error) => LawOutcome::Failed { error },
        }
    }
}
