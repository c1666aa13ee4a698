use async_trait::async_trait;

use super::types::LawList;
use crate::error::Result;

/// Default e-Gov law API (v2) endpoint
pub const DEFAULT_BASE_URL: &str = "https://laws.e-gov.go.jp/api/2";

/// Trait for sources of law texts
#[async_trait]
pub trait LawSource: Send + Sync {
    /// List every law registered under a category code
    async fn list_laws(&self, category_cd: &str) -> Result<LawList>;

    /// Fetch the full text of one law by law ID or law number
    async fn fetch_law_data(&self, key: &str) -> Result<serde_json::Value>;

    /// Get the base URL for this source
    fn base_url(&self) -> &str;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://laws.e-gov.go.jp/api/2`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 60,
            user_agent: format!("taxlaw/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
