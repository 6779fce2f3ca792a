// SPDX-License-Identifier: MIT OR Apache-2.0

//! URL fetching with a bounded retry loop.
//!
//! # Example
//!
//! ```no_run
//! use homeops::http::{fetch_text, FetchConfig};
//!
//! # async fn run() -> homeops::Result<()> {
//! let config = FetchConfig::default().with_user_agent("myscript/1.0");
//! let body = fetch_text("https://example.com/status", &config).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::config;
use crate::error::{OpsError, Result};
use crate::runtime::{Backoff, RetryConfig};

/// Configuration for [`fetch_text`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Retries after the first attempt.
    pub attempts: u32,
    /// Bound on each individual request.
    pub request_timeout: Duration,
    /// User-Agent header; falls back to the user-agent file when unset.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            request_timeout: Duration::from_secs(2),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Set the number of retries.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set an explicit User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// GET a URL and return the trimmed response body.
///
/// Transient failures (connect errors, timeouts) are retried with a linearly
/// increasing delay, matching a polite scraper; anything else returns
/// immediately. Exhausted retries come back as
/// [`OpsError::RetriesExhausted`].
pub async fn fetch_text(url: &str, fetch_config: &FetchConfig) -> Result<String> {
    let url = Url::parse(url).map_err(|e| OpsError::Config(format!("Invalid URL {url}: {e}")))?;

    let user_agent = match &fetch_config.user_agent {
        Some(ua) => ua.clone(),
        None => config::user_agent(config::DEFAULT_USER_AGENT_PATH)?,
    };
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(fetch_config.request_timeout)
        .build()?;

    info!("Loading {url}");
    let retry = RetryConfig::new(
        fetch_config.attempts,
        Backoff::Linear {
            step: Duration::from_secs(2),
            max: Duration::from_secs(30),
        },
    );
    retry
        .execute(url.as_str(), || async {
            let response = client.get(url.clone()).send().await?;
            let body = response.error_for_status()?.text().await?;
            Ok(body.trim().to_string())
        })
        .await
}
