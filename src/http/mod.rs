//! HTTP module
//!
//! A concrete [`PageFetcher`](crate::pagination::PageFetcher) for paged REST
//! endpoints, on top of a reqwest client with retry and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Local Pacing**: Optional token bucket limiter using governor
//! - **Usage Headers**: `X-RateLimit-*` headers feed the usage tracker

mod client;
mod fetcher;
mod rate_limit;

pub use client::HttpClient;
pub use fetcher::{HttpPageFetcher, PAGE_PARAM, PER_PAGE_PARAM};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
