use cinefav_core::error::ErrorEnvelope;
use cinefav_core::types::{MovieDetail, RemoveOutcome, SearchPage};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/v1/api";

/// The backend endpoints the client consumes.
#[async_trait::async_trait]
pub trait MoviesApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ClientError>;

    async fn list_favorites(&self) -> Result<Vec<MovieDetail>, ClientError>;

    async fn add_favorite(&self, imdb_id: &str) -> Result<MovieDetail, ClientError>;

    async fn remove_favorite(&self, imdb_id: &str) -> Result<RemoveOutcome, ClientError>;
}

pub struct HttpMoviesApi {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpMoviesApi {
    /// `base_url` points at the versioned API root, e.g.
    /// `http://localhost:3000/v1/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let (code, message) = match resp.json::<ErrorEnvelope>().await {
                Ok(env) => (env.error.code, env.error.message),
                Err(_) => ("unknown".to_string(), status.to_string()),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        resp.json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn network(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

#[async_trait::async_trait]
impl MoviesApi for HttpMoviesApi {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ClientError> {
        debug!(query, page, "GET movies");
        let page = page.to_string();
        let resp = self
            .client
            .get(self.url(&["movies"]))
            .query(&[("query", query), ("page", page.as_str())])
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    async fn list_favorites(&self) -> Result<Vec<MovieDetail>, ClientError> {
        debug!("GET favorites");
        let resp = self
            .client
            .get(self.url(&["favorites"]))
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    async fn add_favorite(&self, imdb_id: &str) -> Result<MovieDetail, ClientError> {
        debug!(imdb_id, "POST favorites");
        let resp = self
            .client
            .post(self.url(&["favorites"]))
            .json(&serde_json::json!({ "imdbID": imdb_id }))
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }

    async fn remove_favorite(&self, imdb_id: &str) -> Result<RemoveOutcome, ClientError> {
        debug!(imdb_id, "DELETE favorites");
        let resp = self
            .client
            .delete(self.url(&["favorites", imdb_id]))
            .send()
            .await
            .map_err(network)?;
        Self::decode(resp).await
    }
}
