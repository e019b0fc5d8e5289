//! City name cache
//!
//! Process-wide memo map from postal code to resolved city name, owned by
//! the address service and injectable so tests can reset or substitute it.

use dashmap::DashMap;

/// Zip → city cache.
///
/// Unbounded and never evicted: an entry is written only after a
/// successful, non-empty upstream resolution, and a hit never triggers an
/// upstream call. Concurrent misses for the same uncached zip may both
/// reach upstream; the last writer wins.
#[derive(Debug, Default)]
pub struct CityCache {
    entries: DashMap<String, String>,
}

impl CityCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, zip: &str) -> Option<String> {
        self.entries.get(zip).map(|entry| entry.value().clone())
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&self, zip: K, city: V) {
        self.entries.insert(zip.into(), city.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries. Only used by tests to get a clean slate.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
