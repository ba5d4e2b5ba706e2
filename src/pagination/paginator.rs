//! Page driver
//!
//! Drives a [`PageFetcher`] for one page or for every page of a listing.

use super::types::{Page, PageFetcher, PageRequest};
use crate::config::PaginationConfig;
use crate::error::{Error, FetchError, Result};
use crate::usage::UsageTracker;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Tracks progress of a fetch-all run
#[derive(Debug, Clone, Copy, Default)]
struct PaginationState {
    /// Page about to be requested
    page: u32,
    /// Items accumulated so far
    total_fetched: u64,
}

impl PaginationState {
    fn new() -> Self {
        Self {
            page: 1,
            total_fetched: 0,
        }
    }

    fn advance(&mut self, fetched: usize) {
        self.total_fetched += fetched as u64;
        self.page += 1;
    }
}

/// Drives paged endpoints with the service's page-size ceiling
///
/// Every successful fetcher call is counted against the injected
/// [`UsageTracker`], if one was given.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginationConfig,
    usage: Option<Arc<UsageTracker>>,
}

impl Paginator {
    /// Create a paginator without usage tracking
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            config,
            usage: None,
        }
    }

    /// Count every successful fetch against `tracker`
    #[must_use]
    pub fn with_usage_tracker(mut self, tracker: Arc<UsageTracker>) -> Self {
        self.usage = Some(tracker);
        self
    }

    /// Largest page size this paginator will request
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    pub fn usage_tracker(&self) -> Option<&Arc<UsageTracker>> {
        self.usage.as_ref()
    }

    /// Fetch a single page and apply its skip filters
    ///
    /// Errors from the fetcher, including not-found, are returned unchanged
    /// as [`Error::Fetch`].
    pub async fn fetch_page<T, F>(&self, fetcher: &F, request: PageRequest) -> Result<Page<T>>
    where
        T: Send,
        F: PageFetcher<T> + ?Sized,
    {
        request.validate()?;
        let request = request.capped(self.config.max_page_size);
        Ok(self.fetch_raw(fetcher, request).await?)
    }

    /// Fetch every page of a listing and concatenate them in remote order
    ///
    /// Pages are requested at the maximum page size starting from page 1
    /// until a page comes back empty. A full page never ends the run, since
    /// it cannot be told apart from "exactly one page left".
    ///
    /// # Use with caution
    ///
    /// There is no upper bound on how many pages this will request. Only use
    /// it for listings the caller knows to be bounded; every page costs one
    /// call against both usage windows.
    ///
    /// Any page failure aborts the run. Items gathered before the failure are
    /// dropped, and the error names the page that failed.
    pub async fn fetch_all<T, F>(&self, fetcher: &F) -> Result<Vec<T>>
    where
        T: Send,
        F: PageFetcher<T> + ?Sized,
    {
        let page_size = self.config.max_page_size;
        let mut state = PaginationState::new();
        let mut all_items = Vec::new();

        loop {
            let request = PageRequest::with_ceiling(state.page, page_size, page_size)?;
            let page = self
                .fetch_raw(fetcher, request)
                .await
                .map_err(|e| Error::page_fetch(state.page, e))?;

            if page.is_empty() {
                debug!(
                    "Fetch-all finished after {} page(s), {} item(s)",
                    state.page, state.total_fetched
                );
                break;
            }

            state.advance(page.len());
            all_items.extend(page);
        }

        Ok(all_items)
    }

    /// Stream pages with the same sequencing as [`Paginator::fetch_all`]
    ///
    /// Each non-empty page is yielded as it arrives. The stream ends at the
    /// first empty page, or right after yielding the first error.
    pub fn stream_pages<'a, T, F>(&'a self, fetcher: &'a F) -> BoxStream<'a, Result<Page<T>>>
    where
        T: Send + 'a,
        F: PageFetcher<T> + ?Sized,
    {
        let page_size = self.config.max_page_size;

        stream::try_unfold(1u32, move |page_number| async move {
            let request = PageRequest::with_ceiling(page_number, page_size, page_size)?;
            let page = self
                .fetch_raw(fetcher, request)
                .await
                .map_err(|e| Error::page_fetch(page_number, e))?;

            if page.is_empty() {
                return Ok::<_, Error>(None);
            }
            Ok::<_, Error>(Some((page, page_number + 1)))
        })
        .boxed()
    }

    async fn fetch_raw<T, F>(
        &self,
        fetcher: &F,
        request: PageRequest,
    ) -> std::result::Result<Page<T>, FetchError>
    where
        T: Send,
        F: PageFetcher<T> + ?Sized,
    {
        let page_number = request.page_number();
        let page_size = request.page_size();

        let mut items = fetcher.fetch(page_number, page_size).await?;

        if let Some(ref usage) = self.usage {
            usage.record_call();
        }

        let limit = page_size as usize;
        if items.len() > limit {
            warn!(
                "Page {} returned {} items for page size {}, truncating",
                page_number,
                items.len(),
                limit
            );
            items.truncate(limit);
        }

        debug!("Fetched page {} ({} items)", page_number, items.len());

        let items = apply_skips(items, request.skip_first_count(), request.skip_last_count());
        Ok(Page::new(request, items))
    }
}

/// Drop `skip_first` items from the head, then `skip_last` from what remains
fn apply_skips<T>(mut items: Vec<T>, skip_first: u32, skip_last: u32) -> Vec<T> {
    let head = (skip_first as usize).min(items.len());
    items.drain(..head);

    let keep = items.len().saturating_sub(skip_last as usize);
    items.truncate(keep);
    items
}
