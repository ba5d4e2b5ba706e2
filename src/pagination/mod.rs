//! Pagination module
//!
//! Validates page requests and drives paged endpoints, either for a single
//! page or for a complete listing.
//!
//! # Overview
//!
//! - `PageRequest` - 1-based page number, capped page size and skip filters
//! - `PageFetcher` - the one-page capability each resource area implements
//! - `Paginator` - applies the page-size ceiling and skip filters, and drives
//!   fetch-all runs until an empty page comes back

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{Page, PageFetcher, PageRequest};

#[cfg(test)]
mod tests;
