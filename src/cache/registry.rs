//! Cache registry and the per-resource cache capability

use crate::error::{ClearError, ClearFailure, Error, Result};
use crate::types::ResourceArea;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// A resource area's cache, as seen by the registry
///
/// Each resource service owns its cache outright. The registry only needs
/// to be able to empty it.
#[async_trait]
pub trait ResourceCache: Send + Sync {
    /// Discard every entry
    async fn clear(&self) -> std::result::Result<(), ClearError>;
}

struct CacheEntry {
    area: ResourceArea,
    cache: Weak<dyn ResourceCache>,
}

/// Fans a single "clear everything" out to every registered cache
///
/// The registry holds weak handles: dropping the owning service drops its
/// cache, and the registry simply skips it from then on.
#[derive(Default)]
pub struct CacheRegistry {
    entries: RwLock<Vec<CacheEntry>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cache` as the cache of `area`
    ///
    /// Registering an area again replaces its handle in place, so the area
    /// keeps its original position in the clearing order.
    pub async fn register<C>(&self, area: ResourceArea, cache: &Arc<C>)
    where
        C: ResourceCache + 'static,
    {
        let handle: Weak<C> = Arc::downgrade(cache);
        let handle: Weak<dyn ResourceCache> = handle;
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.iter_mut().find(|e| e.area == area) {
            debug!("Replacing cache handle for {}", area);
            entry.cache = handle;
        } else {
            debug!("Registered cache for {}", area);
            entries.push(CacheEntry {
                area,
                cache: handle,
            });
        }
    }

    /// Remove the handle for `area`; returns whether one was registered
    pub async fn unregister(&self, area: ResourceArea) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.area != area);
        entries.len() != before
    }

    /// Registered areas in clearing order
    pub async fn areas(&self) -> Vec<ResourceArea> {
        self.entries.read().await.iter().map(|e| e.area).collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Clear every live registered cache in registration order
    ///
    /// A failing cache does not stop the sweep. When any cache fails, the
    /// result is [`Error::CacheClear`] listing every failing area.
    pub async fn clear_all(&self) -> Result<()> {
        // Snapshot the handles so no lock is held across a clear
        let handles: Vec<(ResourceArea, Weak<dyn ResourceCache>)> = self
            .entries
            .read()
            .await
            .iter()
            .map(|e| (e.area, e.cache.clone()))
            .collect();

        let mut failures = Vec::new();
        let mut cleared = 0usize;

        for (area, handle) in handles {
            let Some(cache) = handle.upgrade() else {
                debug!("Cache for {} is gone, nothing to clear", area);
                continue;
            };

            let outcome = AssertUnwindSafe(cache.clear())
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(ClearError::new("clear panicked")));

            match outcome {
                Ok(()) => {
                    cleared += 1;
                    debug!("Cleared cache for {}", area);
                }
                Err(error) => {
                    error!("Failed to clear cache for {}: {}", area, error);
                    failures.push(ClearFailure { area, error });
                }
            }
        }

        if failures.is_empty() {
            info!("Cleared {} resource cache(s)", cleared);
            Ok(())
        } else {
            Err(Error::CacheClear { failures })
        }
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry").finish_non_exhaustive()
    }
}
