//! Pagination types and traits
//!
//! Defines the page request value, the page result, and the fetcher
//! capability every resource area implements.

use crate::config::DEFAULT_MAX_PAGE_SIZE;
use crate::error::{Error, FetchError, Result};
use async_trait::async_trait;
use std::sync::Arc;

// ============================================================================
// Page Request
// ============================================================================

/// A validated request for one page of results
///
/// `page_number` is 1-based. `page_size` is capped at the ceiling given at
/// construction. The skip counts trim the page after it has been fetched;
/// they never change which page is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
    skip_first: u32,
    skip_last: u32,
}

impl PageRequest {
    /// Create a request capped at the service's default ceiling
    pub fn new(page_number: u32, page_size: u32) -> Result<Self> {
        Self::with_ceiling(page_number, page_size, DEFAULT_MAX_PAGE_SIZE)
    }

    /// Create a request capped at `max_page_size`
    ///
    /// A page number or size below 1 is rejected. A size above the ceiling is
    /// lowered to the ceiling, since the remote API enforces the same limit.
    pub fn with_ceiling(page_number: u32, page_size: u32, max_page_size: u32) -> Result<Self> {
        if max_page_size == 0 {
            return Err(Error::invalid_argument("max page size must be at least 1"));
        }

        let request = Self {
            page_number,
            page_size,
            skip_first: 0,
            skip_last: 0,
        };
        request.validate()?;

        Ok(request.capped(max_page_size))
    }

    /// First page at the default ceiling
    pub fn first_page() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_MAX_PAGE_SIZE,
            skip_first: 0,
            skip_last: 0,
        }
    }

    /// Drop this many items from the head of the fetched page
    #[must_use]
    pub fn skip_first(mut self, count: u32) -> Self {
        self.skip_first = count;
        self
    }

    /// Drop this many items from the tail of the fetched page
    #[must_use]
    pub fn skip_last(mut self, count: u32) -> Self {
        self.skip_last = count;
        self
    }

    /// Check the page number and page size are both at least 1
    pub fn validate(&self) -> Result<()> {
        if self.page_number < 1 {
            return Err(Error::invalid_argument(format!(
                "page number must be at least 1, got {}",
                self.page_number
            )));
        }
        if self.page_size < 1 {
            return Err(Error::invalid_argument(format!(
                "page size must be at least 1, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    /// Request for the following page, same size, no skips
    ///
    /// The last representable page number is its own successor.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page_number: self.page_number.saturating_add(1),
            page_size: self.page_size,
            skip_first: 0,
            skip_last: 0,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn skip_first_count(&self) -> u32 {
        self.skip_first
    }

    pub fn skip_last_count(&self) -> u32 {
        self.skip_last
    }

    pub(crate) fn capped(mut self, max_page_size: u32) -> Self {
        self.page_size = self.page_size.min(max_page_size);
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first_page()
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of results after the skip filters were applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    request: PageRequest,
    items: Vec<T>,
}

impl<T> Page<T> {
    pub(crate) fn new(request: PageRequest, items: Vec<T>) -> Self {
        Self { request, items }
    }

    /// The request that produced this page
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// 1-based page number
    pub fn number(&self) -> u32 {
        self.request.page_number
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Capability to fetch one page of a resource listing
///
/// Implementations must return an empty vec (not an error) for a page past
/// the last one with data, and [`FetchError::NotFound`] when the parent
/// resource does not exist at all.
#[async_trait]
pub trait PageFetcher<T: Send>: Send + Sync {
    /// Fetch the raw items of page `page_number` (1-based)
    async fn fetch(&self, page_number: u32, page_size: u32)
        -> std::result::Result<Vec<T>, FetchError>;
}

#[async_trait]
impl<T, F> PageFetcher<T> for Arc<F>
where
    T: Send,
    F: PageFetcher<T> + ?Sized,
{
    async fn fetch(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> std::result::Result<Vec<T>, FetchError> {
        (**self).fetch(page_number, page_size).await
    }
}
