use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::client::{ClientConfig, LawSource};
use super::http_client::create_http_client;
use super::types::{summary_from_entry, LawList, LawListResponse};
use crate::error::{Result, TaxlawError};

const LIST_PATH: &str = "laws";
const LAW_DATA_PATH: &str = "law_data";

/// e-Gov law API (v2) client
pub struct EgovClient {
    base_url: Url,
    base_url_str: String,
    http_client: Client,
}

impl EgovClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TaxlawError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TaxlawError::Config(format!(
                "Base URL '{}' cannot carry path segments",
                config.base_url
            )));
        }

        Ok(Self {
            base_url,
            base_url_str: config.base_url.clone(),
            http_client: create_http_client(config.timeout, &config.user_agent)?,
        })
    }

    /// URL for the list endpoint
    pub fn list_url(&self, category_cd: &str) -> Url {
        let mut url = self.endpoint(&[LIST_PATH]);
        url.query_pairs_mut()
            .append_pair("category_cd", category_cd)
            .append_pair("response_format", "json");
        url
    }

    /// URL for the full-text endpoint; the key becomes one percent-encoded path segment
    pub fn law_data_url(&self, key: &str) -> Url {
        let mut url = self.endpoint(&[LAW_DATA_PATH, key]);
        url.query_pairs_mut()
            .append_pair("law_full_text_format", "json")
            .append_pair("response_format", "json")
            .append_pair("extraction_target", "all");
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        // cannot_be_a_base() was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.http_client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaxlawError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            TaxlawError::Parse(format!(
                "Failed to parse response from {} as JSON: {}. Response starts with: {}",
                url,
                e,
                response_text.chars().take(100).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl LawSource for EgovClient {
    async fn list_laws(&self, category_cd: &str) -> Result<LawList> {
        let raw: LawListResponse = self.get_json(self.list_url(category_cd)).await?;
        let raw = raw.unwrap_envelope();

        let entries = raw.law_info_list.ok_or_else(|| {
            TaxlawError::Parse("Unexpected response format: law_info_list is missing".to_string())
        })?;

        let mut laws = Vec::with_capacity(entries.len());
        let mut dropped = 0;
        for (index, entry) in entries.iter().enumerate() {
            match summary_from_entry(entry, category_cd) {
                Some(summary) => laws.push(summary),
                None => {
                    warn!("Skipping list entry {} without a usable law_id", index);
                    debug!("Skipped entry: {}", entry);
                    dropped += 1;
                }
            }
        }

        debug!(
            "Listed {} laws for category {} (total_count: {:?}, dropped: {})",
            laws.len(),
            category_cd,
            raw.total_count,
            dropped
        );

        Ok(LawList {
            laws,
            total_count: raw.total_count,
            dropped,
        })
    }

    async fn fetch_law_data(&self, key: &str) -> Result<serde_json::Value> {
        self.get_json(self.law_data_url(key)).await
    }

    fn base_url(&self) -> &str {
        &self.base_url_str
    }
}
