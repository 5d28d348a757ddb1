//! In-memory favorites list.
//!
//! Entries live for the lifetime of the process. Listing preserves insertion
//! order; there is at most one entry per identifier.

use std::collections::HashMap;
use std::sync::Arc;

use cinefav_core::types::{MovieDetail, RemoveOutcome};
use cinefav_metadata::{DetailService, ServiceError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::FavoritesError;

/// Where the store gets full records for identifiers it has not seen yet.
#[async_trait::async_trait]
pub trait DetailLookup: Send + Sync {
    async fn lookup(&self, id: &str) -> Result<Option<MovieDetail>, ServiceError>;
}

#[async_trait::async_trait]
impl DetailLookup for DetailService {
    async fn lookup(&self, id: &str) -> Result<Option<MovieDetail>, ServiceError> {
        self.get_by_id(id).await
    }
}

#[derive(Default)]
struct Entries {
    order: Vec<String>,
    by_id: HashMap<String, MovieDetail>,
}

impl Entries {
    /// Insert or replace in place under the identifier the caller asked
    /// for. A replaced entry keeps its position.
    fn upsert(&mut self, id: &str, detail: MovieDetail) {
        if self.by_id.insert(id.to_string(), detail).is_none() {
            self.order.push(id.to_string());
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        if self.by_id.remove(id).is_none() {
            return false;
        }
        self.order.retain(|k| k != id);
        true
    }
}

/// Keyed collection of favorited movies.
///
/// The lock is never held across the upstream lookup. Two concurrent adds of
/// the same never-seen identifier can therefore both miss, both look up and
/// both insert; the later insert replaces the earlier one and neither call
/// fails. Sequential adds of an identifier perform exactly one lookup.
#[derive(Clone)]
pub struct FavoritesStore {
    lookup: Arc<dyn DetailLookup>,
    entries: Arc<Mutex<Entries>>,
}

impl FavoritesStore {
    pub fn new(lookup: Arc<dyn DetailLookup>) -> Self {
        Self {
            lookup,
            entries: Arc::new(Mutex::new(Entries::default())),
        }
    }

    /// Add a movie by identifier, fetching its details on first add.
    pub async fn add(&self, id: &str) -> Result<MovieDetail, FavoritesError> {
        if let Some(existing) = self.entries.lock().await.by_id.get(id) {
            debug!(imdb_id = id, "movie already in favorites");
            return Ok(existing.clone());
        }

        let detail = self
            .lookup
            .lookup(id)
            .await?
            .ok_or_else(|| FavoritesError::NotFound(id.to_string()))?;

        let mut entries = self.entries.lock().await;
        if entries.by_id.contains_key(id) {
            debug!(imdb_id = id, "concurrent add won the race, replacing entry");
        }
        entries.upsert(id, detail.clone());
        debug!(imdb_id = id, total = entries.order.len(), "added movie to favorites");

        Ok(detail)
    }

    /// All favorites in insertion order.
    pub async fn list(&self) -> Vec<MovieDetail> {
        let entries = self.entries.lock().await;
        let favorites: Vec<_> = entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect();
        debug!(count = favorites.len(), "retrieved favorites");
        favorites
    }

    pub async fn remove(&self, id: &str) -> RemoveOutcome {
        if self.entries.lock().await.remove(id) {
            debug!(imdb_id = id, "removed movie from favorites");
            RemoveOutcome::removed()
        } else {
            debug!(imdb_id = id, "movie was not in favorites");
            RemoveOutcome::not_present()
        }
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.entries.lock().await.by_id.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
