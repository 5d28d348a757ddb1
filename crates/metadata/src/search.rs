use std::collections::HashSet;

use cinefav_core::types::{MovieSummary, POSTER_ABSENT, SearchPage};
use tracing::{debug, error, warn};

use crate::provider::{ProviderRecord, SharedProvider};
use crate::{ServiceError, require_non_blank};

/// Free-text title search against the configured provider.
#[derive(Clone)]
pub struct SearchService {
    provider: Option<SharedProvider>,
}

impl SearchService {
    pub const DEFAULT_PAGE: u32 = 1;

    /// `provider` is `None` when no API key is configured; every search then
    /// fails with [`ServiceError::Configuration`].
    pub fn new(provider: Option<SharedProvider>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ServiceError> {
        require_non_blank(query, "Query parameter is required")?;

        let Some(provider) = &self.provider else {
            warn!("search rejected: OMDb API key is not configured");
            return Err(ServiceError::Configuration);
        };

        debug!(query, page, provider = provider.name(), "searching movies");

        let payload = provider.search(query, page).await.map_err(|e| {
            error!(query, page, error = %e, "error searching provider");
            ServiceError::Upstream("Failed to search movies".into())
        })?;

        if payload.records.is_empty() && payload.total_results.is_none() {
            debug!(query, "no results");
            return Ok(SearchPage::empty());
        }

        Ok(SearchPage {
            results: dedup_summaries(payload.records),
            total_results: parse_total(payload.total_results.as_deref()),
        })
    }
}

/// First occurrence of each identifier wins; order is preserved.
fn dedup_summaries(records: Vec<ProviderRecord>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|r| {
            let id = r.imdb_id?;
            if !seen.insert(id.clone()) {
                return None;
            }
            Some(MovieSummary {
                imdb_id: id,
                title: r.title.unwrap_or_default(),
                year: r.year.unwrap_or_default(),
                poster: r.poster.unwrap_or_else(|| POSTER_ABSENT.to_string()),
            })
        })
        .collect()
}

fn parse_total(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}
