use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::{Result, TaxlawError};

/// Build the HTTP client shared by every request of a run
pub fn create_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(user_agent)
        .use_rustls_tls()
        .build()
        .map_err(TaxlawError::Network)
}
