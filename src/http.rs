//! Channel metadata fetches.

use reqwest::header::ACCEPT;
use tracing::debug;

use crate::error::MetadataError;

/// GET `url` and return the body. Non-success statuses are errors.
pub async fn get_text(http: &reqwest::Client, url: &str) -> Result<String, MetadataError> {
    debug!(url, "fetching channel metadata");
    let response = http
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MetadataError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// HTTP client with the crate's user agent.
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}
