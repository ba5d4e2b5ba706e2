//! `PageFetcher` backed by a paged REST endpoint

use super::client::HttpClient;
use crate::error::FetchError;
use crate::pagination::PageFetcher;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Query parameter carrying the 1-based page number
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size
pub const PER_PAGE_PARAM: &str = "per_page";

/// Fetches pages of `T` from `GET {base}/{path}?page=N&per_page=M`
///
/// The endpoint must answer with a JSON array; an empty array marks the end
/// of the collection.
pub struct HttpPageFetcher<T> {
    client: Arc<HttpClient>,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    pub fn new(client: Arc<HttpClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<T> Clone for HttpPageFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for HttpPageFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch(&self, page_number: u32, page_size: u32) -> Result<Vec<T>, FetchError> {
        let query = [
            (PAGE_PARAM, page_number.to_string()),
            (PER_PAGE_PARAM, page_size.to_string()),
        ];

        let response = self.client.get(&self.path, &query).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::decode(e.to_string()))
    }
}
