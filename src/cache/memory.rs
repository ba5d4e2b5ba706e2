//! In-memory resource cache

use super::registry::ResourceCache;
use crate::error::ClearError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

/// Keyed in-memory cache for one resource area
///
/// A clear racing with an in-flight fetch may be followed immediately by
/// that fetch repopulating the cache.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store a value, returning the previous one for `key`
    pub async fn insert(&self, key: K, value: V) -> Option<V> {
        self.entries.write().await.insert(key, value)
    }

    pub async fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<K, V> Default for MemoryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> ResourceCache for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    async fn clear(&self) -> Result<(), ClearError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
