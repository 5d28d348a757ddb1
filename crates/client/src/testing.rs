use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cinefav_core::types::{MovieDetail, MovieSummary, RemoveOutcome, SearchPage};

use crate::ClientError;
use crate::api::MoviesApi;

/// A page of `count` synthetic results with ids `{query}-{page}-{n}`.
pub fn page_of(query: &str, page: u32, count: usize, total: u64) -> SearchPage {
    SearchPage {
        results: (0..count)
            .map(|n| MovieSummary {
                imdb_id: format!("{query}-{page}-{n}"),
                title: format!("{query} {page}.{n}"),
                year: "2005".into(),
                poster: "N/A".into(),
            })
            .collect(),
        total_results: total,
    }
}

pub fn detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        summary: MovieSummary {
            imdb_id: id.into(),
            title: title.into(),
            year: "2005".into(),
            poster: "https://example.com/poster.jpg".into(),
        },
        plot: None,
        director: Some("Christopher Nolan".into()),
        genre: Some("Action, Crime".into()),
        runtime: None,
        imdb_rating: Some("8.2".into()),
    }
}

/// Scripted backend. Delays are keyed by query or identifier and use the
/// tokio clock so paused-time tests stay deterministic.
#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<HashMap<String, Vec<SearchPage>>>,
    delays: Mutex<HashMap<String, Duration>>,
    catalogue: Mutex<Vec<MovieDetail>>,
    favorites: Mutex<Vec<MovieDetail>>,
    searches: Mutex<Vec<(String, u32)>>,
    favorite_loads: Mutex<usize>,
    fail: AtomicBool,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_pages(&self, query: &str, pages: Vec<SearchPage>) {
        self.pages.lock().unwrap().insert(query.to_string(), pages);
    }

    pub fn set_delay(&self, key: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
    }

    pub fn add_to_catalogue(&self, movie: MovieDetail) {
        self.catalogue.lock().unwrap().push(movie);
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn favorite_loads(&self) -> usize {
        *self.favorite_loads.lock().unwrap()
    }

    async fn pause(&self, key: &str) {
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MoviesApi for FakeApi {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ClientError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        self.pause(query).await;
        self.check()?;

        let pages = self.pages.lock().unwrap();
        Ok(pages
            .get(query)
            .and_then(|p| p.get(page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_favorites(&self) -> Result<Vec<MovieDetail>, ClientError> {
        *self.favorite_loads.lock().unwrap() += 1;
        self.pause("favorites").await;
        self.check()?;
        Ok(self.favorites.lock().unwrap().clone())
    }

    async fn add_favorite(&self, imdb_id: &str) -> Result<MovieDetail, ClientError> {
        self.pause(imdb_id).await;
        self.check()?;

        let found = self
            .catalogue
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.imdb_id() == imdb_id)
            .cloned();
        let Some(movie) = found else {
            return Err(ClientError::Api {
                status: 404,
                code: "not_found".into(),
                message: format!("Movie with imdbID {imdb_id} not found"),
            });
        };

        let mut favorites = self.favorites.lock().unwrap();
        if !favorites.iter().any(|m| m.imdb_id() == imdb_id) {
            favorites.push(movie.clone());
        }
        Ok(movie)
    }

    async fn remove_favorite(&self, imdb_id: &str) -> Result<RemoveOutcome, ClientError> {
        self.pause(imdb_id).await;
        self.check()?;

        let mut favorites = self.favorites.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|m| m.imdb_id() != imdb_id);
        Ok(if favorites.len() < before {
            RemoveOutcome::removed()
        } else {
            RemoveOutcome::not_present()
        })
    }
}
