//! Explicit query cache shared by the search and favorites units.
//!
//! Each entry remembers when its data was fetched. Data older than the
//! cache's freshness window, or explicitly invalidated, is stale: it is still
//! served, but the owning unit revalidates it.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

use crate::ClientError;

/// Lifecycle of a cached query: `Idle -> Loading -> {Success, Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub data: Option<V>,
    pub fetched_at: Option<Instant>,
    pub state: QueryState,
    pub error: Option<ClientError>,
    /// A request for this key is in flight.
    pub is_fetching: bool,
    invalidated: bool,
}

impl<K, V> CacheEntry<K, V> {
    fn new(key: K) -> Self {
        Self {
            key,
            data: None,
            fetched_at: None,
            state: QueryState::Idle,
            error: None,
            is_fetching: false,
            invalidated: false,
        }
    }

    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        match self.fetched_at {
            Some(at) if !self.invalidated => now.saturating_duration_since(at) < window,
            _ => false,
        }
    }
}

pub struct QueryCache<K, V> {
    entries: HashMap<K, CacheEntry<K, V>>,
    fresh_for: Duration,
}

impl<K: Eq + Hash + Clone, V> QueryCache<K, V> {
    pub fn new(fresh_for: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            fresh_for,
        }
    }

    pub fn fresh_for(&self) -> Duration {
        self.fresh_for
    }

    pub fn get(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut CacheEntry<K, V>> {
        self.entries.get_mut(key)
    }

    fn entry(&mut self, key: &K) -> &mut CacheEntry<K, V> {
        self.entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(key.clone()))
    }

    pub fn is_fresh(&self, key: &K, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.is_fresh(now, self.fresh_for))
    }

    /// Mark a fetch as started. Entries without data move to `Loading`;
    /// entries with data keep showing it.
    pub fn begin_fetch(&mut self, key: &K) {
        let entry = self.entry(key);
        entry.is_fetching = true;
        if entry.data.is_none() {
            entry.state = QueryState::Loading;
        }
    }

    pub fn complete(&mut self, key: &K, data: V, now: Instant) {
        let entry = self.entry(key);
        entry.data = Some(data);
        entry.fetched_at = Some(now);
        entry.state = QueryState::Success;
        entry.error = None;
        entry.is_fetching = false;
        entry.invalidated = false;
    }

    /// Record a failed fetch. Previously fetched data is kept.
    pub fn fail(&mut self, key: &K, error: ClientError) {
        let entry = self.entry(key);
        entry.state = QueryState::Error;
        entry.error = Some(error);
        entry.is_fetching = false;
    }

    /// Make the entry stale so the next read refetches it.
    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.invalidated = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
