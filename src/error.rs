use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxlawError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error at {shown}: {source}", shown = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Law {law_id} not found; fallback by law number {law_num} failed: {fallback}")]
    LookupFailed {
        law_id: String,
        law_num: String,
        primary: Box<TaxlawError>,
        fallback: Box<TaxlawError>,
    },

    #[error("{failed} of {total} laws failed to download")]
    PartialFailure { failed: usize, total: usize },
}

impl TaxlawError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for an HTTP 404 response, the only status that triggers the law number fallback
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("Check your internet connection and try again.".to_string()),
            Self::HttpStatus { status, .. } if status.is_server_error() => Some(
                "The e-Gov API is having trouble. Please try again later.".to_string(),
            ),
            Self::HttpStatus { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS => Some(
                "You've made too many requests. Increase --sleep-seconds and retry.".to_string(),
            ),
            Self::HttpStatus { .. } => {
                Some("Check --base-url and --category-cd.".to_string())
            }
            Self::Parse(_) => Some(
                "The API response did not look like an e-Gov v2 law list. Check --base-url."
                    .to_string(),
            ),
            Self::Io { .. } => Some(
                "Check that the output directory is writable and the disk is not full."
                    .to_string(),
            ),
            Self::Config(_) => Some("Run 'taxlaw config path' to locate the config file.".to_string()),
            Self::PartialFailure { .. } => {
                Some("Rerun with --verbose to see why each law failed.".to_string())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaxlawError>;
