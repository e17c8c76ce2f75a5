use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct CachedResponse {
    pub body: Vec<u8>,
    pub created_at: Instant,
}

/// TTL response cache keyed on the normalized query. Entries live at most
/// `ttl` (the 15-minute staleness bound); when full, the oldest entry is
/// evicted.
pub struct HotResponseCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CachedResponse>,
}

impl HotResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<CachedResponse> {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, value: CachedResponse) {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        if self.entries.len() >= self.max_entries {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(key, value);
    }
}
