use cinefav_core::types::{MovieDetail, MovieSummary, POSTER_ABSENT};
use tracing::{debug, error, warn};

use crate::provider::{ProviderRecord, SharedProvider};
use crate::{ServiceError, require_non_blank};

/// Single-record lookup by provider identifier.
#[derive(Clone)]
pub struct DetailService {
    provider: Option<SharedProvider>,
}

impl DetailService {
    pub fn new(provider: Option<SharedProvider>) -> Self {
        Self { provider }
    }

    /// `Ok(None)` is the absence signal: the provider knows no such record.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<MovieDetail>, ServiceError> {
        require_non_blank(id, "imdbID parameter is required")?;

        let Some(provider) = &self.provider else {
            warn!("lookup rejected: OMDb API key is not configured");
            return Err(ServiceError::Configuration);
        };

        debug!(imdb_id = id, "fetching movie details");

        let record = provider.get_by_id(id).await.map_err(|e| {
            error!(imdb_id = id, error = %e, "error fetching movie by id");
            ServiceError::Upstream("Failed to fetch movie details".into())
        })?;

        match record {
            Some(r) => Ok(Some(into_detail(id, r))),
            None => {
                warn!(imdb_id = id, "provider returned no movie");
                Ok(None)
            }
        }
    }
}

fn into_detail(requested_id: &str, r: ProviderRecord) -> MovieDetail {
    MovieDetail {
        summary: MovieSummary {
            imdb_id: r.imdb_id.unwrap_or_else(|| requested_id.to_string()),
            title: r.title.unwrap_or_default(),
            year: r.year.unwrap_or_default(),
            poster: r.poster.unwrap_or_else(|| POSTER_ABSENT.to_string()),
        },
        plot: r.plot,
        director: r.director,
        genre: r.genre,
        runtime: r.runtime,
        imdb_rating: r.imdb_rating,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::fake::FakeProvider;

    fn batman_begins() -> ProviderRecord {
        ProviderRecord {
            imdb_id: Some("tt0372784".into()),
            title: Some("Batman Begins".into()),
            year: Some("2005".into()),
            poster: Some("https://example.com/poster.jpg".into()),
            plot: Some("After training with his mentor...".into()),
            director: Some("Christopher Nolan".into()),
            genre: Some("Action, Crime".into()),
            runtime: Some("140 min".into()),
            imdb_rating: Some("8.2".into()),
        }
    }

    #[tokio::test]
    async fn returns_full_detail() {
        let svc = DetailService::new(Some(Arc::new(FakeProvider::with_record(Some(
            batman_begins(),
        )))));

        let detail = svc.get_by_id("tt0372784").await.unwrap().unwrap();
        assert_eq!(detail.imdb_id(), "tt0372784");
        assert_eq!(detail.summary.title, "Batman Begins");
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(detail.imdb_rating.as_deref(), Some("8.2"));
    }

    #[tokio::test]
    async fn missing_optional_fields_stay_absent() {
        let record = ProviderRecord {
            imdb_id: Some("tt0468569".into()),
            title: Some("The Dark Knight".into()),
            year: Some("2008".into()),
            poster: Some("https://example.com/poster2.jpg".into()),
            ..Default::default()
        };
        let svc = DetailService::new(Some(Arc::new(FakeProvider::with_record(Some(record)))));

        let detail = svc.get_by_id("tt0468569").await.unwrap().unwrap();
        assert_eq!(detail.plot, None);
        assert_eq!(detail.runtime, None);
        assert_eq!(detail.imdb_rating, None);
    }

    #[tokio::test]
    async fn no_result_is_absence_not_error() {
        let svc = DetailService::new(Some(Arc::new(FakeProvider::with_record(None))));
        assert_eq!(svc.get_by_id("invalid-id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_id_is_invalid() {
        let svc = DetailService::new(Some(Arc::new(FakeProvider::default())));
        assert!(matches!(svc.get_by_id("").await, Err(ServiceError::InvalidInput(_))));
        assert!(matches!(svc.get_by_id("   ").await, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_upstream() {
        let svc = DetailService::new(Some(Arc::new(FakeProvider::failing("timeout"))));
        assert_eq!(
            svc.get_by_id("tt0372784").await.unwrap_err(),
            ServiceError::Upstream("Failed to fetch movie details".into())
        );
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let svc = DetailService::new(None);
        assert_eq!(
            svc.get_by_id("tt0372784").await.unwrap_err(),
            ServiceError::Configuration
        );
    }
}
