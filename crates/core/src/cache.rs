use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default freshness window for fetched market data.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A thread-safe cache with TTL support.
///
/// Quote lists and single quotes go stale after five minutes; expired
/// entries are dropped lazily on read.
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
    default_ttl: Duration,
}

struct Entry<V> {
    value: V,
    deadline: Instant,
}

impl<V> Entry<V> {
    fn is_fresh(&self) -> bool {
        self.deadline > Instant::now()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Get a value, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh() {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    /// Insert a value with the default TTL.
    pub fn set(&self, key: String, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Insert a value with a custom TTL.
    pub fn set_with_ttl(&self, key: String, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            deadline: Instant::now() + ttl,
        };
        self.entries.insert(key, entry);
    }

    /// Remove a value, returning it if present.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including not-yet-collected expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
