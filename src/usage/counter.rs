//! Usage window counters and classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which usage window a count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageWindow {
    /// The short (15 minute) window
    Short,
    /// The daily window
    Daily,
}

impl fmt::Display for UsageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageWindow::Short => f.write_str("short"),
            UsageWindow::Daily => f.write_str("daily"),
        }
    }
}

/// How close a window is to its ceiling
///
/// Variants are ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageClass {
    /// Below the warning threshold
    Normal,
    /// At or above the warning threshold, at most 100%
    Warning,
    /// Above 100%
    Exceeded,
}

impl UsageClass {
    /// Classify a percentage against a warning threshold
    pub fn classify(percent_used: f64, warn_threshold_percent: f64) -> Self {
        if percent_used > 100.0 {
            UsageClass::Exceeded
        } else if percent_used >= warn_threshold_percent {
            UsageClass::Warning
        } else {
            UsageClass::Normal
        }
    }
}

impl fmt::Display for UsageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageClass::Normal => f.write_str("NORMAL"),
            UsageClass::Warning => f.write_str("WARNING"),
            UsageClass::Exceeded => f.write_str("EXCEEDED"),
        }
    }
}

/// Percent used and its classification for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStatus {
    pub percent_used: f64,
    pub classification: UsageClass,
}

/// `100 * count / limit`, or 0 when there is no limit
pub fn percent_of(count: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    100.0 * count as f64 / limit as f64
}

/// Lock-free counter for one usage window
///
/// The count only grows within a window; [`UsageWindowCounter::reset`] is
/// called by whoever knows the window rolled over.
#[derive(Debug)]
pub struct UsageWindowCounter {
    limit: AtomicU64,
    count: AtomicU64,
}

impl UsageWindowCounter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit: AtomicU64::new(limit),
            count: AtomicU64::new(0),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit.load(Ordering::Relaxed)
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Add one call and return the new count
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Raise the count to `count` if it is higher; returns the previous count
    pub fn raise_to(&self, count: u64) -> u64 {
        self.count.fetch_max(count, Ordering::Relaxed)
    }

    pub fn set_limit(&self, limit: u64) {
        self.limit.store(limit, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    pub fn percent_used(&self) -> f64 {
        percent_of(self.count(), self.limit())
    }

    /// Current percent used, classified against `warn_threshold_percent`
    pub fn status(&self, warn_threshold_percent: f64) -> WindowStatus {
        let percent_used = self.percent_used();
        WindowStatus {
            percent_used,
            classification: UsageClass::classify(percent_used, warn_threshold_percent),
        }
    }
}
