//! Server-reported usage
//!
//! The remote API reports both windows on every response as two
//! comma-separated headers, short window first:
//!
//! ```text
//! X-RateLimit-Limit: 600,30000
//! X-RateLimit-Usage: 314,27536
//! ```

use serde::{Deserialize, Serialize};

/// Header carrying the limits of both windows
pub const LIMIT_HEADER: &str = "X-RateLimit-Limit";

/// Header carrying the usage of both windows
pub const USAGE_HEADER: &str = "X-RateLimit-Usage";

/// Limits and usage of both windows as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitReport {
    pub short_limit: u64,
    pub daily_limit: u64,
    pub short_usage: u64,
    pub daily_usage: u64,
}

impl RateLimitReport {
    /// Parse the limit and usage header values
    ///
    /// Returns `None` unless both values hold exactly two integers.
    pub fn parse(limit: &str, usage: &str) -> Option<Self> {
        let (short_limit, daily_limit) = parse_pair(limit)?;
        let (short_usage, daily_usage) = parse_pair(usage)?;
        Some(Self {
            short_limit,
            daily_limit,
            short_usage,
            daily_usage,
        })
    }
}

fn parse_pair(value: &str) -> Option<(u64, u64)> {
    let mut parts = value.split(',').map(|p| p.trim().parse::<u64>());
    let first = parts.next()?.ok()?;
    let second = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}
