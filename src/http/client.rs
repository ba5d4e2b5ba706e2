//! HTTP client with retry and pacing
//!
//! Handles:
//! - Automatic retries with configurable backoff
//! - Optional local pacing so a burst of fetches stays polite
//! - Feeding server-reported rate-limit usage into a [`UsageTracker`]
//!
//! Failures come back as [`FetchError`] so they pass through the paginator
//! unchanged.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::config::HttpConfig;
use crate::error::{is_retryable_status, FetchError, Result};
use crate::types::BackoffType;
use crate::usage::{RateLimitReport, UsageTracker, LIMIT_HEADER, USAGE_HEADER};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry-After fallback when a 429 carries no usable header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client with retry and pacing
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_retries: u32,
    backoff_type: BackoffType,
    initial_backoff: Duration,
    max_backoff: Duration,
    rate_limiter: Option<RateLimiter>,
    usage: Option<Arc<UsageTracker>>,
}

impl HttpClient {
    /// Build a client from the `http` config section
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("fitpage/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let rate_limiter = config
            .requests_per_second
            .map(|rps| RateLimiter::new(&RateLimiterConfig::per_second(rps)));

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
            max_retries: config.max_retries,
            backoff_type: config.backoff,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            rate_limiter,
            usage: None,
        })
    }

    /// Send `token` as a bearer credential on every request
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Apply rate-limit headers from every response to `tracker`
    #[must_use]
    pub fn with_usage_tracker(mut self, tracker: Arc<UsageTracker>) -> Self {
        self.usage = Some(tracker);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if local pacing is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET `path` relative to the base URL
    ///
    /// Retries 429, retryable 5xx, timeouts and connection failures up to
    /// `max_retries` times. 404 maps to [`FetchError::NotFound`] and 401/403
    /// to [`FetchError::Unauthorized`]; neither is retried.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<Response, FetchError> {
        let url = self.build_url(path);
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.get(&url).query(query);
            if let Some(ref token) = self.token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(response) => {
                    self.record_rate_limit_headers(response.headers());
                    let status = response.status();

                    if status.is_success() {
                        debug!("GET {} -> {}", url, status.as_u16());
                        return Ok(response);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(response.headers());
                        if attempt < self.max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                self.max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(FetchError::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    if is_retryable_status(status.as_u16()) && attempt < self.max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(status_error(status, path, body));
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Transport error ({}), attempt {}/{}, retrying in {:?}",
                            e,
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(FetchError::transport(e.to_string()));
                }
            }
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn record_rate_limit_headers(&self, headers: &HeaderMap) {
        let Some(ref tracker) = self.usage else {
            return;
        };

        let limit = headers.get(LIMIT_HEADER).and_then(|v| v.to_str().ok());
        let usage = headers.get(USAGE_HEADER).and_then(|v| v.to_str().ok());

        if let (Some(limit), Some(usage)) = (limit, usage) {
            match RateLimitReport::parse(limit, usage) {
                Some(report) => tracker.apply_server_report(&report),
                None => debug!("Ignoring malformed rate limit headers: {limit} / {usage}"),
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .field("max_retries", &self.max_retries)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Map a final non-success status to a fetch failure
fn status_error(status: StatusCode, path: &str, body: String) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::not_found(path),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            if body.is_empty() {
                FetchError::unauthorized(format!("HTTP {}", status.as_u16()))
            } else {
                FetchError::unauthorized(body)
            }
        }
        _ => FetchError::http_status(status.as_u16(), body),
    }
}

/// Extract retry-after header value
fn extract_retry_after(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
