use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::api::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Result, TaxlawError};

const CONFIG_DIR_NAME: &str = ".taxlaw";
const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_CATEGORY_CD: &str = "13";
pub const DEFAULT_SLEEP_SECONDS: f64 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_OUTPUT_DIR: &str = "tax_laws";

/// Keys accepted by `config get/set/unset`
pub const CONFIG_KEYS: &[&str] = &[
    "download.base_url",
    "download.category_cd",
    "download.sleep_seconds",
    "download.timeout",
    "download.output_dir",
];

/// Application configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadSettings,
}

/// Partially specified download settings. Used both for the config file
/// section and for command-line overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DownloadSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_cd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl DownloadSettings {
    /// Fill every unset field from `lower`
    pub fn or(self, lower: &DownloadSettings) -> DownloadSettings {
        DownloadSettings {
            base_url: self.base_url.or_else(|| lower.base_url.clone()),
            category_cd: self.category_cd.or_else(|| lower.category_cd.clone()),
            sleep_seconds: self.sleep_seconds.or(lower.sleep_seconds),
            timeout: self.timeout.or(lower.timeout),
            output_dir: self.output_dir.or_else(|| lower.output_dir.clone()),
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| TaxlawError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Create the configuration directory and a default file if missing
    pub fn initialize() -> Result<()> {
        let config_file = Self::config_file_path()?;
        if !config_file.exists() {
            Self::default().save_to(&config_file)?;
        }
        Ok(())
    }

    /// Load configuration from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from a file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| TaxlawError::Config(format!("Failed to read config file: {}", e)))?;

        // An empty file is valid and means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&contents)
            .map_err(|e| TaxlawError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    TaxlawError::Config(format!("Failed to create config directory: {}", e))
                })?;

                // Set directory permissions to 0700 on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = fs::Permissions::from_mode(0o700);
                    fs::set_permissions(dir, permissions).map_err(|e| {
                        TaxlawError::Config(format!("Failed to set directory permissions: {}", e))
                    })?;
                }
            }
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| TaxlawError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| TaxlawError::Config(format!("Failed to write config file: {}", e)))?;

        // Set file permissions to 0600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).map_err(|e| {
                TaxlawError::Config(format!("Failed to set file permissions: {}", e))
            })?;
        }

        Ok(())
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let settings = &mut self.download;
        match key {
            "download.base_url" => {
                validate_base_url(value)?;
                settings.base_url = Some(value.to_string());
            }
            "download.category_cd" => {
                settings.category_cd = Some(validate_category_cd(value)?);
            }
            "download.sleep_seconds" => {
                let seconds = value.parse::<f64>().map_err(|_| {
                    TaxlawError::Config(format!("'{}' is not a number of seconds", value))
                })?;
                validate_sleep_seconds(seconds)?;
                settings.sleep_seconds = Some(seconds);
            }
            "download.timeout" => {
                let timeout = value.parse::<u64>().map_err(|_| {
                    TaxlawError::Config(format!("'{}' is not a whole number of seconds", value))
                })?;
                validate_timeout(timeout)?;
                settings.timeout = Some(timeout);
            }
            "download.output_dir" => {
                settings.output_dir = Some(PathBuf::from(value));
            }
            _ => {
                return Err(TaxlawError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Remove a configuration value so the built-in default applies again
    pub fn unset(&mut self, key: &str) -> Result<()> {
        let settings = &mut self.download;
        match key {
            "download.base_url" => settings.base_url = None,
            "download.category_cd" => settings.category_cd = None,
            "download.sleep_seconds" => settings.sleep_seconds = None,
            "download.timeout" => settings.timeout = None,
            "download.output_dir" => settings.output_dir = None,
            _ => {
                return Err(TaxlawError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        let settings = &self.download;
        match key {
            "download.base_url" => settings.base_url.clone(),
            "download.category_cd" => settings.category_cd.clone(),
            "download.sleep_seconds" => settings.sleep_seconds.map(|s| s.to_string()),
            "download.timeout" => settings.timeout.map(|t| t.to_string()),
            "download.output_dir" => settings.output_dir.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }
}

/// Fully resolved settings for one download run
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
    pub base_url: String,
    pub category_cd: String,
    /// Pause between two consecutive laws
    pub sleep: Duration,
    /// Maximum number of laws to process
    pub limit: Option<usize>,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            category_cd: DEFAULT_CATEGORY_CD.to_string(),
            sleep: Duration::from_secs_f64(DEFAULT_SLEEP_SECONDS),
            limit: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DownloadConfig {
    /// Apply built-in defaults to whatever `settings` leaves unset, then validate
    pub fn resolve(settings: DownloadSettings, limit: Option<usize>) -> Result<Self> {
        let base_url = settings
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        let category_cd = validate_category_cd(
            settings
                .category_cd
                .as_deref()
                .unwrap_or(DEFAULT_CATEGORY_CD),
        )?;

        let sleep = validate_sleep_seconds(settings.sleep_seconds.unwrap_or(DEFAULT_SLEEP_SECONDS))?;

        let timeout = settings.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        validate_timeout(timeout)?;

        if limit == Some(0) {
            return Err(TaxlawError::InvalidInput(
                "--limit must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            output_dir: settings
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            base_url,
            category_cd,
            sleep,
            limit,
            timeout,
        })
    }

    /// HTTP client settings derived from this run
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            ..Default::default()
        }
    }
}

fn validate_base_url(value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| TaxlawError::InvalidInput(format!("Invalid base URL '{}': {}", value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TaxlawError::InvalidInput(format!(
            "Base URL must use http or https, got '{}'",
            scheme
        ))),
    }
}

fn validate_category_cd(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaxlawError::InvalidInput(
            "Category code cannot be empty".to_string(),
        ));
    }
    Ok(value.to_string())
}

/// Checks the value and converts it; values a `Duration` cannot hold are rejected
fn validate_sleep_seconds(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        TaxlawError::InvalidInput(format!(
            "Sleep seconds must be a non-negative number of reasonable size, got {}",
            seconds
        ))
    })
}

fn validate_timeout(timeout: u64) -> Result<()> {
    if timeout == 0 {
        return Err(TaxlawError::InvalidInput(
            "Timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(())
}
