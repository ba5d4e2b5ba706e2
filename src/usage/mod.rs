//! Usage tracking module
//!
//! Counts remote calls against the service's two usage windows.
//!
//! # Overview
//!
//! - `UsageWindowCounter` - atomic count and limit for one window
//! - `UsageTracker` - the short and daily windows together, with
//!   classification into normal, warning and exceeded
//! - `UsageObserver` - where classification changes are reported
//! - `RateLimitReport` - limits and usage parsed from response headers
//! - `WindowRoller` - tokio task resetting the windows on a schedule

mod counter;
mod report;
mod roller;
mod tracker;

pub use counter::{percent_of, UsageClass, UsageWindow, UsageWindowCounter, WindowStatus};
pub use report::{RateLimitReport, LIMIT_HEADER, USAGE_HEADER};
pub use roller::WindowRoller;
pub use tracker::{TracingObserver, UsageObserver, UsageSnapshot, UsageTracker, WindowSnapshot};
