// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))
}

/// Map a response status to an error unless it is a success.
pub fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::Remote {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// GET a URL and return the body, failing on non-2xx statuses.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::request(url, e))?;
    check_status(url, response.status())?;
    response.text().await.map_err(|e| AppError::request(url, e))
}

/// GET a URL and decode the body as JSON.
pub async fn fetch_json<T: DeserializeOwned + Send>(client: &Client, url: &str) -> Result<T> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).map_err(|e| AppError::decode(url, e))
}
