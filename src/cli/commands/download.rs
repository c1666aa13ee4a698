use log::debug;

use crate::api::EgovClient;
use crate::cli::args::DownloadArgs;
use crate::config::{Config, DownloadConfig};
use crate::download::{Downloader, FixedDelay};
use crate::error::{Result, TaxlawError};
use crate::output;
use crate::progress::DownloadProgress;

/// Execute download command
pub async fn execute(args: DownloadArgs, quiet: bool) -> Result<()> {
    // Command line and environment win over the config file
    let file_config = Config::load()?;
    let settings = args.settings().or(&file_config.download);
    let config = DownloadConfig::resolve(settings, args.limit)?;
    debug!("Resolved download configuration: {:?}", config);

    let client = EgovClient::new(&config.client_config())?;
    let throttle = FixedDelay::new(config.sleep);
    let downloader =
        Downloader::new(client, throttle, config).with_progress(DownloadProgress::new(quiet));

    let report = downloader.run().await?;

    if !quiet || report.has_failures() {
        println!("{}", output::format_report(&report));
    }

    if args.strict && report.has_failures() {
        return Err(TaxlawError::PartialFailure {
            failed: report.failed_count(),
            total: report.total(),
        });
    }

    Ok(())
}
