use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

const REQUEST_TIMEOUT_SECONDS: u64 = 30;
const USER_AGENT: &str = concat!("Mozilla/5.0 retrofeed/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` and return the body, failing on any non-2xx status
pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP error {} for {}", response.status(), url);
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))
}
