// src/scraping/request.rs
//! Transport seam plus the shared retry/backoff policy

use crate::error::MatcherError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Browser-like headers with a rotated user agent. Varied per request
/// by the fetch loop, not by the transport.
pub fn random_headers() -> Vec<(String, String)> {
    let ua = USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())];
    vec![
        ("User-Agent".to_string(), ua.to_string()),
        (
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language".to_string(), "en-US,en;q=0.9,hi;q=0.8".to_string()),
        ("Connection".to_string(), "keep-alive".to_string()),
        ("Upgrade-Insecure-Requests".to_string(), "1".to_string()),
        ("Cache-Control".to_string(), "no-cache".to_string()),
        ("Pragma".to_string(), "no-cache".to_string()),
    ]
}

/// Raw page returned by the transport.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// External fetch capability. The core only needs "url plus headers in,
/// status plus body out"; tests substitute a scripted implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<FetchedPage, MatcherError>;
}

/// Production transport over reqwest.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<FetchedPage, MatcherError> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| MatcherError::transport(url, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MatcherError::transport(url, e.to_string()))?;

        Ok(FetchedPage { status, body })
    }
}

/// Retry/backoff policy applied uniformly by every source's fetch loop.
/// Delay bounds are in seconds; actual delays are jittered uniformly
/// within them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Backoff bounds after HTTP 429, scaled by the attempt number.
    pub rate_limit_backoff: (f64, f64),
    /// Backoff bounds after any other failed attempt.
    pub failure_backoff: (f64, f64),
    /// Courtesy pause between queries and between sources.
    pub courtesy_delay: (f64, f64),
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: (3.0, 8.0),
            failure_backoff: (2.0, 5.0),
            courtesy_delay: (1.0, 4.0),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RetryPolicy {
    /// Policy with all delays zeroed, for tests.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: (0.0, 0.0),
            failure_backoff: (0.0, 0.0),
            courtesy_delay: (0.0, 0.0),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn jittered(bounds: (f64, f64)) -> Duration {
        let (lo, hi) = bounds;
        let secs = if hi > lo {
            rand::rng().random_range(lo..hi)
        } else {
            lo
        };
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Escalating delay after a rate-limited attempt (1-based).
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        Self::jittered(self.rate_limit_backoff) * attempt
    }

    pub fn failure_delay(&self) -> Duration {
        Self::jittered(self.failure_backoff)
    }

    pub fn courtesy_pause(&self) -> Duration {
        Self::jittered(self.courtesy_delay)
    }
}

/// Fetch a URL under the retry policy. Returns the page body on a 200,
/// or `None` once attempts are exhausted; a single failing URL is never
/// fatal to the pipeline.
pub async fn request_with_retry(
    fetcher: &dyn PageFetcher,
    policy: &RetryPolicy,
    url: &str,
) -> Option<FetchedPage> {
    for attempt in 1..=policy.max_attempts {
        let headers = random_headers();
        match fetcher.fetch(url, &headers, policy.request_timeout).await {
            Ok(page) if page.status == 200 => {
                debug!("Fetched {} on attempt {}", url, attempt);
                return Some(page);
            }
            Ok(page) if page.status == 429 => {
                if attempt < policy.max_attempts {
                    let delay = policy.rate_limit_delay(attempt);
                    warn!("Rate limited on {}, waiting {:.1}s", url, delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                } else {
                    warn!("Rate limited on {} (attempt {})", url, attempt);
                }
            }
            Ok(page) => {
                warn!("HTTP {} for {} (attempt {})", page.status, url, attempt);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.failure_delay()).await;
                }
            }
            Err(e) => {
                warn!("Request failed (attempt {}): {}", attempt, e);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.failure_delay()).await;
                }
            }
        }
    }
    None
}
