// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

//! # fitpage
//!
//! Paginated bulk fetching and usage-budget tracking for a rate-limited
//! fitness REST API.
//!
//! ## Features
//!
//! - **Page Requests**: validated page number, page size and skips, with the
//!   page size lowered to the service's ceiling
//! - **Fetch-All**: drive a paged endpoint until it returns an empty page
//! - **Usage Windows**: lock-free counters for the 15-minute and daily
//!   windows, classified as normal, warning or exceeded
//! - **Cache Invalidation**: one call clears every resource cache when
//!   credentials are revoked
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fitpage::{Config, HttpPageFetcher, Result, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = Session::new(Config::default())?;
//!     let client = session.http_client(Some("token".to_string()))?;
//!     let fetcher: HttpPageFetcher<serde_json::Value> =
//!         HttpPageFetcher::new(Arc::new(client), "athlete/activities");
//!
//!     // Every activity, page by page
//!     let activities = session.paginator().fetch_all(&fetcher).await?;
//!
//!     println!("{} activities", activities.len());
//!     println!("{:?}", session.usage_snapshot());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Session                              │
//! │  paginator()       usage()        caches()   revoke_credentials()│
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴────────┬─────────────────────────┐
//! │   Paginate    │        Usage          │         Cache           │
//! ├───────────────┼───────────────────────┼─────────────────────────┤
//! │ PageRequest   │ UsageTracker          │ CacheRegistry           │
//! │ fetch_page    │ Short / Daily window  │ ResourceCache           │
//! │ fetch_all     │ WindowRoller          │ MemoryCache             │
//! │ stream_pages  │ RateLimitReport       │                         │
//! └───────┬───────┴───────────────────────┴─────────────────────────┘
//!         │ PageFetcher
//! ┌───────┴───────────────────────────────┐
//! │ HTTP: HttpPageFetcher, retry, pacing  │
//! └───────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for fitpage
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration
pub mod config;

/// Page requests and the paginator
pub mod pagination;

/// Usage window tracking
pub mod usage;

/// Resource cache registry
pub mod cache;

/// HTTP page fetcher with retry and pacing
pub mod http;

/// Client session wiring
pub mod session;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ClearError, Error, FetchError, Result};
pub use types::*;

// Re-export commonly used types
pub use cache::{CacheRegistry, MemoryCache, ResourceCache};
pub use config::Config;
pub use http::{HttpClient, HttpPageFetcher};
pub use pagination::{Page, PageFetcher, PageRequest, Paginator};
pub use session::{Session, SessionUsage};
pub use usage::{UsageClass, UsageObserver, UsageTracker, WindowRoller, WindowStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
