//! Bounded in-memory cache of aggregate responses.
//!
//! Entries are keyed by query, engine set and page. Once the number of
//! entries exceeds the capacity, the oldest `evict` entries (by insertion
//! order) are dropped in one sweep. The cache is owned by whoever serves
//! queries; there is no process-wide instance.

use std::collections::{HashMap, VecDeque};

use tokio::sync::Mutex;
use tracing::debug;

use crate::AggregateResponse;

/// Default maximum number of cached responses.
pub const DEFAULT_CAPACITY: usize = 100;
/// Default number of oldest entries dropped once capacity is exceeded.
pub const DEFAULT_EVICT: usize = 20;

/// Builds the cache key for a query, engine set and page.
///
/// Engine order does not matter: `[bing, google]` and `[google, bing]`
/// produce the same key.
pub fn cache_key(query: &str, engines: &[String], page: u32) -> String {
    let mut sorted: Vec<&str> = engines.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("{}:{}:{}", query, sorted.join(","), page)
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, AggregateResponse>,
    order: VecDeque<String>,
}

/// Size-bounded response cache with oldest-first eviction.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<Entries>,
    capacity: usize,
    evict: usize,
}

impl ResponseCache {
    /// Creates a cache holding up to `capacity` entries, dropping the oldest
    /// `evict` (at least one) whenever that is exceeded.
    pub fn new(capacity: usize, evict: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity,
            evict: evict.max(1),
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up a cached response.
    pub async fn get(&self, key: &str) -> Option<AggregateResponse> {
        let entries = self.entries.lock().await;
        entries.map.get(key).cloned()
    }

    /// Stores a response, evicting the oldest entries when over capacity.
    pub async fn insert(&self, key: impl Into<String>, response: AggregateResponse) {
        let key = key.into();
        let mut entries = self.entries.lock().await;

        if entries.map.insert(key.clone(), response).is_none() {
            entries.order.push_back(key);
        }

        if entries.map.len() > self.capacity {
            let evict = self.evict.min(entries.order.len());
            for _ in 0..evict {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.map.remove(&oldest);
                }
            }
            debug!("Evicted {} cached responses", evict);
        }
    }

    /// Number of cached responses.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.map.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_EVICT)
    }
}
