//! Run configuration, built once at startup and passed to each stage

use crate::error::{FeedError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.balldontlie.io/v1";
pub const DEFAULT_OUTPUT: &str = "nba_game_logs_2024_25.csv";
pub const DEFAULT_SEASONS: [u32; 2] = [2024, 2025];

/// Backoff policy for rate-limited and transient failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Pause before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// No waiting at all, for tests and dry runs
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Everything a run needs to know
#[derive(Debug, Clone)]
pub struct Config {
    /// Sent verbatim as the Authorization header
    pub api_key: String,
    pub base_url: Url,
    pub output: PathBuf,
    pub seasons: Vec<u32>,
    /// Player ids per stats request
    pub chunk_size: usize,
    pub per_page: u32,
    /// Pause between roster pages
    pub roster_delay: Duration,
    /// Pause between stat pages
    pub stats_delay: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Create a configuration with the production defaults
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FeedError::MissingCredential);
        }

        Ok(Self {
            api_key,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            output: PathBuf::from(DEFAULT_OUTPUT),
            seasons: DEFAULT_SEASONS.to_vec(),
            chunk_size: 50,
            per_page: 100,
            roster_delay: Duration::from_millis(100),
            stats_delay: Duration::from_millis(120),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_seasons(mut self, seasons: Vec<u32>) -> Result<Self> {
        if seasons.is_empty() {
            return Err(FeedError::InvalidConfig("at least one season is required".to_string()));
        }
        self.seasons = seasons;
        Ok(self)
    }

    /// Drop all pacing and backoff; used by tests
    pub fn without_delays(mut self) -> Self {
        self.roster_delay = Duration::ZERO;
        self.stats_delay = Duration::ZERO;
        self.retry = RetryPolicy::immediate(self.retry.max_attempts);
        self
    }

    /// Full URL for an endpoint path such as `stats/advanced`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| FeedError::InvalidConfig(format!("Invalid URL {}: {}", joined, e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| FeedError::InvalidConfig(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FeedError::InvalidConfig(format!(
            "Base URL must be http or https: {}",
            raw
        )));
    }
    Ok(url)
}
