use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::DownloadSettings;

/// Download command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Directory to save JSON files [default: tax_laws]
    #[arg(short, long, env = "TAXLAW_OUTPUT_DIR", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// e-Gov API root [default: https://laws.e-gov.go.jp/api/2]
    #[arg(long, env = "TAXLAW_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Law category code, 13 is national tax [default: 13]
    #[arg(short, long, env = "TAXLAW_CATEGORY_CD", value_name = "CODE")]
    pub category_cd: Option<String>,

    /// Delay between detail requests in seconds [default: 0.5]
    #[arg(short, long, env = "TAXLAW_SLEEP_SECONDS", value_name = "SECONDS")]
    pub sleep_seconds: Option<f64>,

    /// Process at most this many laws
    #[arg(short, long, env = "TAXLAW_LIMIT")]
    pub limit: Option<usize>,

    /// Per-request timeout in seconds [default: 60]
    #[arg(short, long, env = "TAXLAW_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Exit with an error if any law failed to download
    #[arg(long)]
    pub strict: bool,
}

impl DownloadArgs {
    /// Settings given on the command line or through the environment
    pub fn settings(&self) -> DownloadSettings {
        DownloadSettings {
            base_url: self.base_url.clone(),
            category_cd: self.category_cd.clone(),
            sleep_seconds: self.sleep_seconds,
            timeout: self.timeout,
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., download.sleep_seconds)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Remove a configuration value
    Unset {
        /// Configuration key
        key: String,
    },

    /// List all configuration values
    List,

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}
