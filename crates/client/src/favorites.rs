//! Favorites unit: one cached list plus add/remove mutations.
//!
//! Mutations go straight to the server. When a mutation settles, whether it
//! succeeded or not, the cached list is invalidated so the next read
//! fetches the authoritative list. The cached list is never edited locally.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cinefav_core::types::{MovieDetail, RemoveOutcome};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::ClientError;
use crate::api::MoviesApi;
use crate::cache::{QueryCache, QueryState};

pub const FAVORITES_FRESH_FOR: Duration = Duration::from_secs(2 * 60);

const KEY: &str = "favorites";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesSnapshot {
    pub state: QueryState,
    pub favorites: Vec<MovieDetail>,
    pub is_fetching: bool,
    pub error: Option<ClientError>,
    pub is_adding: bool,
    pub is_removing: bool,
}

impl FavoritesSnapshot {
    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.iter().any(|m| m.imdb_id() == imdb_id)
    }

    /// Either mutation is running; favorite toggles are disabled meanwhile.
    pub fn is_mutating(&self) -> bool {
        self.is_adding || self.is_removing
    }
}

/// Counts one running mutation for as long as it is alive.
struct Pending(Arc<AtomicUsize>);

impl Pending {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

enum Action {
    Nothing,
    Foreground,
    Background,
}

#[derive(Clone)]
pub struct FavoritesUnit {
    api: Arc<dyn MoviesApi>,
    cache: Arc<Mutex<QueryCache<&'static str, Vec<MovieDetail>>>>,
    adding: Arc<AtomicUsize>,
    removing: Arc<AtomicUsize>,
}

impl FavoritesUnit {
    pub fn new(api: Arc<dyn MoviesApi>) -> Self {
        Self::with_freshness(api, FAVORITES_FRESH_FOR)
    }

    pub fn with_freshness(api: Arc<dyn MoviesApi>, fresh_for: Duration) -> Self {
        Self {
            api,
            cache: Arc::new(Mutex::new(QueryCache::new(fresh_for))),
            adding: Arc::default(),
            removing: Arc::default(),
        }
    }

    pub async fn snapshot(&self) -> FavoritesSnapshot {
        let cache = self.cache.lock().await;
        let entry = cache.get(&KEY);
        FavoritesSnapshot {
            state: entry.map(|e| e.state).unwrap_or(QueryState::Idle),
            favorites: entry.and_then(|e| e.data.clone()).unwrap_or_default(),
            is_fetching: entry.is_some_and(|e| e.is_fetching),
            error: entry.and_then(|e| e.error.clone()),
            is_adding: self.adding.load(Ordering::SeqCst) > 0,
            is_removing: self.removing.load(Ordering::SeqCst) > 0,
        }
    }

    /// Read the list: waits for the first load, serves fresh data as is,
    /// and revalidates stale data in the background.
    pub async fn load(&self) -> FavoritesSnapshot {
        let action = {
            let cache = self.cache.lock().await;
            match cache.get(&KEY) {
                Some(e) if e.is_fetching => Action::Nothing,
                Some(e) if e.data.is_some() => {
                    if cache.is_fresh(&KEY, Instant::now()) {
                        Action::Nothing
                    } else {
                        Action::Background
                    }
                }
                _ => Action::Foreground,
            }
        };

        match action {
            Action::Foreground => {
                let _ = self.refetch().await;
            }
            Action::Background => {
                let unit = self.clone();
                tokio::spawn(async move {
                    let _ = unit.refetch().await;
                });
            }
            Action::Nothing => {}
        }

        self.snapshot().await
    }

    /// Fetch the list now, regardless of freshness.
    pub async fn refetch(&self) -> Result<Vec<MovieDetail>, ClientError> {
        self.cache.lock().await.begin_fetch(&KEY);

        let result = self.api.list_favorites().await;

        let mut cache = self.cache.lock().await;
        match &result {
            Ok(list) => {
                debug!(count = list.len(), "favorites loaded");
                cache.complete(&KEY, list.clone(), Instant::now());
            }
            Err(e) => {
                warn!(error = %e, "failed to load favorites");
                cache.fail(&KEY, e.clone());
            }
        }
        result
    }

    pub async fn add(&self, imdb_id: &str) -> Result<MovieDetail, ClientError> {
        let _pending = Pending::start(&self.adding);
        let result = self.api.add_favorite(imdb_id).await;
        if let Err(e) = &result {
            warn!(imdb_id, error = %e, "add favorite failed");
        }
        self.settle().await;
        result
    }

    pub async fn remove(&self, imdb_id: &str) -> Result<RemoveOutcome, ClientError> {
        let _pending = Pending::start(&self.removing);
        let result = self.api.remove_favorite(imdb_id).await;
        if let Err(e) = &result {
            warn!(imdb_id, error = %e, "remove favorite failed");
        }
        self.settle().await;
        result
    }

    /// Add when absent from the cached list, remove when present. Ignored
    /// while another mutation is running.
    pub async fn toggle(&self, imdb_id: &str) -> Result<(), ClientError> {
        let snapshot = self.snapshot().await;
        if snapshot.is_mutating() {
            return Ok(());
        }
        if snapshot.is_favorite(imdb_id) {
            self.remove(imdb_id).await.map(|_| ())
        } else {
            self.add(imdb_id).await.map(|_| ())
        }
    }

    async fn settle(&self) {
        self.cache.lock().await.invalidate(&KEY);
    }
}
