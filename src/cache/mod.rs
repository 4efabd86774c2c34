use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Keyed in-memory cache for one entity type.
///
/// Each slot holds the complete list for its key and is replaced wholesale on
/// every refresh. Readers racing a refresh see either the old or the new list.
pub struct CacheHandler<T: Clone> {
    entries: RwLock<HashMap<String, T>>,
    enabled: bool,
}

impl<T: Clone> CacheHandler<T> {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            enabled,
        }
    }

    pub fn shared(enabled: bool) -> Arc<Self> {
        Arc::new(Self::new(enabled))
    }

    /// Returns a clone of the cached value; always misses when disabled
    pub async fn get(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: T) -> T {
        if self.enabled {
            self.entries.write().await.insert(key.to_string(), value.clone());
            debug!("Cache slot '{}' refreshed", key);
        }
        value
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<T: Clone> Default for CacheHandler<T> {
    fn default() -> Self {
        Self::new(true)
    }
}
