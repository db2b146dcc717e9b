//! Serper client: thin wrapper over the Google-search API at google.serper.dev.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const RESULTS_PER_QUERY: u32 = 10;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

/// One organic result as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Runs one free-text query and returns the organic hits in ranking order.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .header("content-type", "application/json")
            .json(&SearchRequest {
                q: query,
                num: RESULTS_PER_QUERY,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!("Search returned {} organic hits", parsed.organic.len());
        Ok(parsed.organic)
    }
}
