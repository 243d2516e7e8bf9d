//! Blocking HTTP transport for the stats API

use crate::config::Config;
use crate::error::{FeedError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

/// Raw response: status code and body text
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues a single GET. Query pairs may repeat keys (`player_ids[]`).
pub trait Transport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpReply>;
}

/// `reqwest::blocking` transport carrying the API key on every request
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    config: Config,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&config.api_key)
            .map_err(|_| FeedError::InvalidConfig("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("nba-game-feed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpReply> {
        let url = self.config.endpoint(path)?;
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| FeedError::Network(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FeedError::Network(format!("Failed to read response: {}", e)))?;

        Ok(HttpReply { status, body })
    }
}
