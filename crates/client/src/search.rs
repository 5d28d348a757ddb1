//! Paginated search unit.
//!
//! Results are cached per query string. The first page is fetched when a
//! query is first used; further pages are appended on demand until a page
//! comes back empty or `ceil(totalResults / PAGE_SIZE)` pages are loaded.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use cinefav_core::types::{MovieSummary, SearchPage};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::ClientError;
use crate::api::MoviesApi;
use crate::cache::{QueryCache, QueryState};

/// Results per provider page.
pub const PAGE_SIZE: u64 = 10;
pub const SEARCH_FRESH_FOR: Duration = Duration::from_secs(5 * 60);

pub fn total_pages(total_results: u64) -> u64 {
    total_results.div_ceil(PAGE_SIZE)
}

/// Pages loaded so far for one query, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPages {
    pub pages: Vec<SearchPage>,
}

impl SearchPages {
    pub fn results(&self) -> Vec<MovieSummary> {
        self.pages
            .iter()
            .flat_map(|p| p.results.iter().cloned())
            .collect()
    }

    pub fn total_results(&self) -> u64 {
        self.pages.last().map(|p| p.total_results).unwrap_or(0)
    }

    /// Page number to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        let last = self.pages.last()?;
        if last.results.is_empty() {
            return None;
        }
        let loaded = self.pages.len() as u64;
        if loaded < total_pages(last.total_results) {
            u32::try_from(loaded + 1).ok()
        } else {
            None
        }
    }
}

/// What the view sees for the current query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    pub query: Option<String>,
    pub state: QueryState,
    pub results: Vec<MovieSummary>,
    pub total_results: u64,
    pub has_next_page: bool,
    pub is_fetching: bool,
    pub is_fetching_next_page: bool,
    /// The last error came from loading a further page rather than from
    /// (re)fetching the loaded ones.
    pub next_page_failed: bool,
    pub error: Option<ClientError>,
}

impl SearchSnapshot {
    fn idle(query: Option<String>) -> Self {
        Self {
            query,
            state: QueryState::Idle,
            results: Vec::new(),
            total_results: 0,
            has_next_page: false,
            is_fetching: false,
            is_fetching_next_page: false,
            next_page_failed: false,
            error: None,
        }
    }
}

struct Inner {
    cache: QueryCache<String, SearchPages>,
    current: Option<String>,
    next_in_flight: HashSet<String>,
    next_failed: HashSet<String>,
}

impl Inner {
    fn snapshot(&self) -> SearchSnapshot {
        let Some(key) = &self.current else {
            return SearchSnapshot::idle(None);
        };
        let Some(entry) = self.cache.get(key) else {
            return SearchSnapshot {
                state: QueryState::Loading,
                ..SearchSnapshot::idle(Some(key.clone()))
            };
        };

        let data = entry.data.as_ref();
        SearchSnapshot {
            query: Some(key.clone()),
            state: entry.state,
            results: data.map(SearchPages::results).unwrap_or_default(),
            total_results: data.map(SearchPages::total_results).unwrap_or(0),
            has_next_page: data.and_then(SearchPages::next_page).is_some(),
            is_fetching: entry.is_fetching,
            is_fetching_next_page: self.next_in_flight.contains(key),
            next_page_failed: entry.state == QueryState::Error && self.next_failed.contains(key),
            error: entry.error.clone(),
        }
    }
}

enum Action {
    Nothing,
    FetchFirst,
    Revalidate,
}

#[derive(Clone)]
pub struct SearchUnit {
    api: Arc<dyn MoviesApi>,
    inner: Arc<Mutex<Inner>>,
}

impl SearchUnit {
    pub fn new(api: Arc<dyn MoviesApi>) -> Self {
        Self::with_freshness(api, SEARCH_FRESH_FOR)
    }

    pub fn with_freshness(api: Arc<dyn MoviesApi>, fresh_for: Duration) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner {
                cache: QueryCache::new(fresh_for),
                current: None,
                next_in_flight: HashSet::new(),
                next_failed: HashSet::new(),
            })),
        }
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Make `query` current. Blank queries disable the unit. A query with
    /// no cached data waits for its first page; cached but stale data is
    /// returned at once and revalidated in the background.
    pub async fn set_query(&self, query: &str) -> SearchSnapshot {
        if query.trim().is_empty() {
            let mut inner = self.inner.lock().await;
            inner.current = None;
            return inner.snapshot();
        }

        let key = query.to_string();
        let action = {
            let mut inner = self.inner.lock().await;
            inner.current = Some(key.clone());
            match inner.cache.get(&key) {
                Some(e) if e.is_fetching => Action::Nothing,
                Some(e) if e.data.is_some() => {
                    if inner.next_in_flight.contains(&key)
                        || inner.cache.is_fresh(&key, Instant::now())
                    {
                        Action::Nothing
                    } else {
                        Action::Revalidate
                    }
                }
                _ => Action::FetchFirst,
            }
        };

        match action {
            Action::FetchFirst => self.fetch_first(&key).await,
            Action::Revalidate => {
                let unit = self.clone();
                tokio::spawn(async move { unit.revalidate(&key).await });
            }
            Action::Nothing => {}
        }

        self.snapshot().await
    }

    async fn fetch_first(&self, key: &String) {
        self.inner.lock().await.cache.begin_fetch(key);
        debug!(query = %key, "fetching first page");

        let result = self.api.search(key, 1).await;

        let mut inner = self.inner.lock().await;
        inner.next_failed.remove(key);
        match result {
            Ok(page) => inner.cache.complete(key, SearchPages { pages: vec![page] }, Instant::now()),
            Err(e) => {
                warn!(query = %key, error = %e, "search failed");
                inner.cache.fail(key, e);
            }
        }
    }

    /// Refetch every loaded page and swap them in once all succeed.
    async fn revalidate(&self, key: &String) {
        let loaded = {
            let mut inner = self.inner.lock().await;
            let loaded = inner
                .cache
                .get(key)
                .and_then(|e| e.data.as_ref())
                .map(|d| d.pages.len())
                .unwrap_or(1)
                .max(1);
            inner.cache.begin_fetch(key);
            loaded
        };
        debug!(query = %key, pages = loaded, "revalidating stale search");

        let mut pages = Vec::with_capacity(loaded);
        for page in 1..=loaded as u32 {
            match self.api.search(key, page).await {
                Ok(p) => {
                    let last = p.results.is_empty();
                    pages.push(p);
                    if last {
                        break;
                    }
                }
                Err(e) => {
                    warn!(query = %key, page, error = %e, "revalidation failed");
                    let mut inner = self.inner.lock().await;
                    inner.next_failed.remove(key);
                    inner.cache.fail(key, e);
                    return;
                }
            }
        }

        let mut inner = self.inner.lock().await;
        inner.next_failed.remove(key);
        inner.cache.complete(key, SearchPages { pages }, Instant::now());
    }

    /// Load the next page of the current query. Returns `Ok(false)` when
    /// there is nothing to load or a fetch for this query is already running.
    pub async fn fetch_next_page(&self) -> Result<bool, ClientError> {
        let (key, page) = {
            let mut inner = self.inner.lock().await;
            let Some(key) = inner.current.clone() else {
                return Ok(false);
            };
            if inner.next_in_flight.contains(&key) {
                return Ok(false);
            }
            let next = match inner.cache.get(&key) {
                Some(entry) if !entry.is_fetching => {
                    entry.data.as_ref().and_then(SearchPages::next_page)
                }
                _ => None,
            };
            let Some(page) = next else {
                return Ok(false);
            };
            inner.next_in_flight.insert(key.clone());
            (key, page)
        };
        debug!(query = %key, page, "fetching next page");

        let result = self.api.search(&key, page).await;

        let mut inner = self.inner.lock().await;
        inner.next_in_flight.remove(&key);
        match result {
            Ok(next) => {
                inner.next_failed.remove(&key);
                if let Some(entry) = inner.cache.get_mut(&key) {
                    if let Some(data) = entry.data.as_mut() {
                        // Pages were replaced meanwhile; this one no longer lines up.
                        if data.pages.len() + 1 == page as usize {
                            data.pages.push(next);
                        }
                    }
                    entry.state = QueryState::Success;
                    entry.error = None;
                }
                Ok(true)
            }
            Err(e) => {
                warn!(query = %key, page, error = %e, "next page failed");
                inner.next_failed.insert(key.clone());
                inner.cache.fail(&key, e.clone());
                Err(e)
            }
        }
    }

    /// Drop freshness for every cached query.
    pub async fn invalidate_all(&self) {
        self.inner.lock().await.cache.invalidate_all();
    }
}
