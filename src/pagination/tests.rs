//! Tests for pagination module

use super::*;
use crate::config::PaginationConfig;
use crate::error::{Error, FetchError};
use crate::usage::{UsageClass, UsageTracker};
use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use test_case::test_case;

/// Fetcher that serves pre-scripted pages and records every call
struct ScriptedFetcher<T> {
    pages: Vec<Result<Vec<T>, FetchError>>,
    calls: Mutex<Vec<(u32, u32)>>,
}

impl<T: Clone> ScriptedFetcher<T> {
    fn new(pages: Vec<Result<Vec<T>, FetchError>>) -> Self {
        Self {
            pages,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> PageFetcher<T> for ScriptedFetcher<T> {
    async fn fetch(&self, page_number: u32, page_size: u32) -> Result<Vec<T>, FetchError> {
        self.calls.lock().unwrap().push((page_number, page_size));
        self.pages
            .get(page_number as usize - 1)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn ab_fetcher() -> ScriptedFetcher<&'static str> {
    ScriptedFetcher::new(vec![Ok(vec!["a", "b"])])
}

fn paginator() -> Paginator {
    Paginator::new(PaginationConfig::default())
}

// ============================================================================
// PageRequest Tests
// ============================================================================

#[test_case(1, 1 ; "smallest valid")]
#[test_case(3, 50 ; "typical")]
#[test_case(1, 200 ; "at ceiling")]
fn test_page_request_valid(page: u32, size: u32) {
    let request = PageRequest::new(page, size).unwrap();
    assert_eq!(request.page_number(), page);
    assert_eq!(request.page_size(), size);
    assert_eq!(request.skip_first_count(), 0);
    assert_eq!(request.skip_last_count(), 0);
}

#[test_case(201 ; "just above")]
#[test_case(1_000 ; "far above")]
#[test_case(u32::MAX ; "max int")]
fn test_page_request_caps_page_size(size: u32) {
    let request = PageRequest::new(1, size).unwrap();
    assert_eq!(request.page_size(), 200);
}

#[test]
fn test_page_request_custom_ceiling() {
    let request = PageRequest::with_ceiling(2, 80, 50).unwrap();
    assert_eq!(request.page_size(), 50);
    assert_eq!(request.page_number(), 2);
}

#[test_case(0, 10 ; "page number zero")]
#[test_case(1, 0 ; "page size zero")]
#[test_case(0, 0 ; "both zero")]
fn test_page_request_rejects_below_one(page: u32, size: u32) {
    let err = PageRequest::new(page, size).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_page_request_zero_ceiling() {
    let err = PageRequest::with_ceiling(1, 10, 0).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_page_request_default_and_next() {
    let request = PageRequest::default();
    assert_eq!(request, PageRequest::first_page());
    assert_eq!(request.page_number(), 1);
    assert_eq!(request.page_size(), 200);

    let skipped = PageRequest::new(4, 25).unwrap().skip_first(2).skip_last(1);
    let next = skipped.next_page();
    assert_eq!(next, PageRequest::new(5, 25).unwrap());
}

#[test]
fn test_page_request_next_page_at_last_page_number() {
    let last = PageRequest::new(u32::MAX, 10).unwrap();
    let next = last.next_page();
    assert_eq!(next.page_number(), u32::MAX);
    assert_eq!(next.page_size(), 10);
}

#[test]
fn test_page_request_value_equality() {
    let a = PageRequest::new(2, 30).unwrap().skip_first(1);
    let b = PageRequest::new(2, 30).unwrap().skip_first(1);
    assert_eq!(a, b);
    assert_ne!(a, b.skip_last(1));
}

// ============================================================================
// fetch_page Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_skip_first() {
    let fetcher = ab_fetcher();
    let request = PageRequest::new(1, 2).unwrap().skip_first(1);

    let page = paginator().fetch_page(&fetcher, request).await.unwrap();

    assert_eq!(page.items(), &["b"]);
    assert_eq!(page.number(), 1);
    assert_eq!(fetcher.calls(), vec![(1, 2)]);
}

#[tokio::test]
async fn test_fetch_page_skip_last() {
    let fetcher = ab_fetcher();
    let request = PageRequest::new(1, 2).unwrap().skip_last(1);

    let page = paginator().fetch_page(&fetcher, request).await.unwrap();

    assert_eq!(page.into_items(), vec!["a"]);
}

#[test_case(2, 0 ; "skip first covers page")]
#[test_case(1, 1 ; "skips meet")]
#[test_case(0, 2 ; "skip last covers page")]
#[test_case(5, 7 ; "skips exceed page")]
fn test_fetch_page_skips_empty_the_page(first: u32, last: u32) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let fetcher = ab_fetcher();
    let request = PageRequest::new(1, 2).unwrap().skip_first(first).skip_last(last);

    let page = rt
        .block_on(paginator().fetch_page(&fetcher, request))
        .unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_page_not_found_passes_through() {
    let fetcher: ScriptedFetcher<u32> =
        ScriptedFetcher::new(vec![Err(FetchError::not_found("club 99"))]);

    let err = paginator()
        .fetch_page(&fetcher, PageRequest::first_page())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch(FetchError::NotFound { ref resource }) if resource == "club 99"
    ));
    assert_eq!(err.failed_page(), None);
}

#[tokio::test]
async fn test_fetch_page_truncates_oversized_page() {
    let fetcher = ScriptedFetcher::new(vec![Ok((1..=10).collect::<Vec<u32>>())]);
    let request = PageRequest::new(1, 4).unwrap().skip_first(1);

    let page = paginator().fetch_page(&fetcher, request).await.unwrap();

    assert_eq!(page.into_items(), vec![2, 3, 4]);
}

#[tokio::test]
async fn test_fetch_page_applies_paginator_ceiling() {
    let fetcher = ScriptedFetcher::new(vec![Ok((1..=10).collect::<Vec<u32>>())]);
    let paginator = Paginator::new(PaginationConfig::new(5));

    let page = paginator
        .fetch_page(&fetcher, PageRequest::new(1, 150).unwrap())
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), vec![(1, 5)]);
    assert_eq!(page.len(), 5);
    assert_eq!(page.request().page_size(), 5);
}

// ============================================================================
// fetch_all Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_all_concatenates_until_empty() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok((1..=200).collect::<Vec<u32>>()),
        Ok((201..=400).collect::<Vec<u32>>()),
        Ok(Vec::new()),
    ]);

    let all = paginator().fetch_all(&fetcher).await.unwrap();

    assert_eq!(all, (1..=400).collect::<Vec<u32>>());
    assert_eq!(fetcher.calls(), vec![(1, 200), (2, 200), (3, 200)]);
}

#[tokio::test]
async fn test_fetch_all_continues_past_short_page() {
    // A short page is not a termination signal; only an empty one is
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![1u32, 2]), Ok(vec![3]), Ok(Vec::new())]);

    let all = paginator().fetch_all(&fetcher).await.unwrap();

    assert_eq!(all, vec![1, 2, 3]);
    assert_eq!(fetcher.calls().len(), 3);
}

#[tokio::test]
async fn test_fetch_all_empty_listing() {
    let fetcher: ScriptedFetcher<u32> = ScriptedFetcher::new(Vec::new());

    let all = paginator().fetch_all(&fetcher).await.unwrap();

    assert!(all.is_empty());
    assert_eq!(fetcher.calls(), vec![(1, 200)]);
}

#[tokio::test]
async fn test_fetch_all_keeps_duplicates_and_order() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![3u32, 1]), Ok(vec![1, 2]), Ok(Vec::new())]);

    let all = paginator().fetch_all(&fetcher).await.unwrap();

    assert_eq!(all, vec![3, 1, 1, 2]);
}

#[tokio::test]
async fn test_fetch_all_aborts_on_unauthorized() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok((1..=200).collect::<Vec<u32>>()),
        Err(FetchError::unauthorized("token revoked")),
        Ok(vec![999]),
    ]);

    let result = paginator().fetch_all(&fetcher).await;

    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.failed_page(), Some(2));
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_fetch_all_aborts_on_not_found() {
    let fetcher: ScriptedFetcher<u32> =
        ScriptedFetcher::new(vec![Err(FetchError::not_found("athlete 7"))]);

    let err = paginator().fetch_all(&fetcher).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.failed_page(), Some(1));
}

#[tokio::test]
async fn test_fetch_all_uses_configured_ceiling() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![1u32; 50]), Ok(Vec::new())]);
    let paginator = Paginator::new(PaginationConfig::new(50));

    paginator.fetch_all(&fetcher).await.unwrap();

    assert_eq!(fetcher.calls(), vec![(1, 50), (2, 50)]);
}

#[tokio::test]
async fn test_fetch_all_through_shared_fetcher() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(vec!["x"]), Ok(Vec::new())]));
    let shared: Arc<dyn PageFetcher<&'static str>> = fetcher.clone();

    let all = paginator().fetch_all(&shared).await.unwrap();

    assert_eq!(all, vec!["x"]);
    assert_eq!(fetcher.calls().len(), 2);
}

// ============================================================================
// Usage Tracking Tests
// ============================================================================

#[tokio::test]
async fn test_successful_calls_are_counted() {
    let tracker = Arc::new(UsageTracker::new(10, 100, 90.0));
    let paginator = paginator().with_usage_tracker(tracker.clone());
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![1u32]), Ok(vec![2]), Ok(Vec::new())]);

    paginator.fetch_all(&fetcher).await.unwrap();

    assert_eq!(tracker.short_window().count(), 3);
    assert_eq!(tracker.daily_window().count(), 3);
}

#[tokio::test]
async fn test_failed_calls_are_not_counted() {
    let tracker = Arc::new(UsageTracker::new(10, 100, 90.0));
    let paginator = paginator().with_usage_tracker(tracker.clone());
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![1u32]),
        Err(FetchError::unauthorized("revoked")),
    ]);

    assert!(paginator.fetch_all(&fetcher).await.is_err());

    assert_eq!(tracker.short_window().count(), 1);
    assert_eq!(
        tracker.short_window_status().classification,
        UsageClass::Normal
    );
}

// ============================================================================
// stream_pages Tests
// ============================================================================

#[tokio::test]
async fn test_stream_pages_yields_each_page() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![1u32, 2]), Ok(vec![3]), Ok(Vec::new())]);
    let paginator = paginator();

    let pages: Vec<_> = paginator.stream_pages(&fetcher).collect().await;

    assert_eq!(pages.len(), 2);
    let numbers: Vec<u32> = pages.iter().map(|p| p.as_ref().unwrap().number()).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_stream_pages_ends_after_error() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![1u32]),
        Err(FetchError::unauthorized("revoked")),
        Ok(vec![3]),
    ]);
    let paginator = paginator();

    let pages: Vec<_> = paginator.stream_pages(&fetcher).collect().await;

    assert_eq!(pages.len(), 2);
    assert!(pages[0].is_ok());
    let err = pages[1].as_ref().unwrap_err();
    assert_eq!(err.failed_page(), Some(2));
    assert_eq!(fetcher.calls().len(), 2);
}
