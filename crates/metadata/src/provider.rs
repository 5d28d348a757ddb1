use std::sync::Arc;

use serde::Deserialize;

use crate::MetadataError;

/// A movie-metadata provider queried by free text or identifier.
///
/// A provider answers "no result" with an empty payload (search) or `None`
/// (lookup). Errors are reserved for transport and decoding failures.
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one page of title matches.
    async fn search(&self, query: &str, page: u32)
    -> Result<ProviderSearchPayload, MetadataError>;

    /// Fetch the full record for an identifier.
    async fn get_by_id(&self, id: &str) -> Result<Option<ProviderRecord>, MetadataError>;
}

pub type SharedProvider = Arc<dyn MovieProvider>;

/// A record as the provider returns it. Every field is optional; fields the
/// system does not know about are dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderRecord {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
}

/// Raw page of search matches. `total_results` is kept as the provider
/// reported it; the search service coerces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSearchPayload {
    pub records: Vec<ProviderRecord>,
    pub total_results: Option<String>,
}

impl ProviderSearchPayload {
    pub fn no_result() -> Self {
        Self::default()
    }
}
