//! Two-window usage tracker

use super::counter::{percent_of, UsageClass, UsageWindow, UsageWindowCounter, WindowStatus};
use super::report::RateLimitReport;
use crate::config::UsageConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Receives classification changes of a usage window
///
/// The tracker only computes classifications. Turning a transition into a
/// log line, a metric or an alert is the observer's job.
pub trait UsageObserver: Send + Sync {
    /// Called once for each move into a more severe class
    fn on_transition(&self, window: UsageWindow, previous: UsageClass, status: WindowStatus);
}

/// Observer that reports transitions through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl UsageObserver for TracingObserver {
    fn on_transition(&self, window: UsageWindow, previous: UsageClass, status: WindowStatus) {
        match status.classification {
            UsageClass::Exceeded => error!(
                "{} usage window exceeded: {:.1}% used (was {})",
                window, status.percent_used, previous
            ),
            UsageClass::Warning => warn!(
                "{} usage window approaching its limit: {:.1}% used",
                window, status.percent_used
            ),
            UsageClass::Normal => debug!(
                "{} usage window back to normal: {:.1}% used",
                window, status.percent_used
            ),
        }
    }
}

/// Raw counts and classification of one window at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub count: u64,
    pub limit: u64,
    pub percent_used: f64,
    pub classification: UsageClass,
}

/// Both windows at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub short: WindowSnapshot,
    pub daily: WindowSnapshot,
}

/// Tracks remote calls against the short and daily windows
///
/// Counting is advisory: an exceeded window is reported to the observer but
/// never blocks or fails a call. The remote service is where limits are
/// enforced. The tracker has no clock; something outside it calls
/// [`UsageTracker::reset_short_window`] and
/// [`UsageTracker::reset_daily_window`] when the windows roll over.
pub struct UsageTracker {
    short: UsageWindowCounter,
    daily: UsageWindowCounter,
    warn_threshold_percent: f64,
    observer: Arc<dyn UsageObserver>,
}

impl UsageTracker {
    /// Create a tracker reporting transitions through `tracing`
    pub fn new(short_window_limit: u64, daily_limit: u64, warn_threshold_percent: f64) -> Self {
        Self {
            short: UsageWindowCounter::new(short_window_limit),
            daily: UsageWindowCounter::new(daily_limit),
            warn_threshold_percent,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Create a tracker from the usage section of the config
    pub fn from_config(config: &UsageConfig) -> Self {
        Self::new(
            config.short_window_limit,
            config.daily_limit,
            config.warn_threshold_percent,
        )
    }

    /// Report transitions to `observer` instead of `tracing`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn UsageObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Count one successful remote call against both windows
    pub fn record_call(&self) {
        for (window, counter) in self.windows() {
            let count = counter.increment();
            self.notify_if_escalated(window, counter.limit(), count - 1, count);
        }
    }

    /// Bring limits and counts in line with what the server reported
    ///
    /// Limits are replaced. Counts are only ever raised, so a stale report
    /// cannot roll a window back.
    pub fn apply_server_report(&self, report: &RateLimitReport) {
        self.short.set_limit(report.short_limit);
        self.daily.set_limit(report.daily_limit);

        let reported = [report.short_usage, report.daily_usage];
        for ((window, counter), usage) in self.windows().into_iter().zip(reported) {
            let previous = counter.raise_to(usage);
            if usage > previous {
                self.notify_if_escalated(window, counter.limit(), previous, usage);
            }
        }
    }

    pub fn short_window_status(&self) -> WindowStatus {
        self.short.status(self.warn_threshold_percent)
    }

    pub fn daily_window_status(&self) -> WindowStatus {
        self.daily.status(self.warn_threshold_percent)
    }

    pub fn reset_short_window(&self) {
        self.short.reset();
    }

    pub fn reset_daily_window(&self) {
        self.daily.reset();
    }

    pub fn short_window(&self) -> &UsageWindowCounter {
        &self.short
    }

    pub fn daily_window(&self) -> &UsageWindowCounter {
        &self.daily
    }

    pub fn warn_threshold_percent(&self) -> f64 {
        self.warn_threshold_percent
    }

    /// Counts, limits and classification of both windows
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            short: self.window_snapshot(&self.short),
            daily: self.window_snapshot(&self.daily),
        }
    }

    fn window_snapshot(&self, counter: &UsageWindowCounter) -> WindowSnapshot {
        let status = counter.status(self.warn_threshold_percent);
        WindowSnapshot {
            count: counter.count(),
            limit: counter.limit(),
            percent_used: status.percent_used,
            classification: status.classification,
        }
    }

    fn windows(&self) -> [(UsageWindow, &UsageWindowCounter); 2] {
        [
            (UsageWindow::Short, &self.short),
            (UsageWindow::Daily, &self.daily),
        ]
    }

    fn notify_if_escalated(&self, window: UsageWindow, limit: u64, before: u64, after: u64) {
        let previous = UsageClass::classify(percent_of(before, limit), self.warn_threshold_percent);
        let percent_used = percent_of(after, limit);
        let current = UsageClass::classify(percent_used, self.warn_threshold_percent);

        if current > previous {
            self.observer.on_transition(
                window,
                previous,
                WindowStatus {
                    percent_used,
                    classification: current,
                },
            );
        }
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::from_config(&UsageConfig::default())
    }
}

impl fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageTracker")
            .field("short", &self.short)
            .field("daily", &self.daily)
            .field("warn_threshold_percent", &self.warn_threshold_percent)
            .finish_non_exhaustive()
    }
}
