use std::collections::HashMap;
use std::sync::Arc;

use cinefav_client::api::{HttpMoviesApi, MoviesApi};
use cinefav_client::{ClientError, FavoritesUnit, SearchUnit};
use cinefav_metadata::{
    MetadataError, MovieProvider, ProviderRecord, ProviderSearchPayload, SharedProvider,
};
use cinefav_server::routes::build_router;
use cinefav_server::state::AppState;

struct Catalogue {
    records: HashMap<String, ProviderRecord>,
}

#[async_trait::async_trait]
impl MovieProvider for Catalogue {
    fn name(&self) -> &str {
        "catalogue"
    }

    async fn search(&self, query: &str, page: u32) -> Result<ProviderSearchPayload, MetadataError> {
        let mut hits: Vec<ProviderRecord> = self
            .records
            .values()
            .filter(|r| {
                r.title
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&query.to_lowercase()))
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.imdb_id.cmp(&b.imdb_id));
        if hits.is_empty() {
            return Ok(ProviderSearchPayload::no_result());
        }

        let total = hits.len();
        let records: Vec<_> = hits.into_iter().skip((page as usize - 1) * 10).take(10).collect();
        if records.is_empty() {
            return Ok(ProviderSearchPayload::no_result());
        }
        Ok(ProviderSearchPayload {
            records,
            total_results: Some(total.to_string()),
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProviderRecord>, MetadataError> {
        Ok(self.records.get(id).cloned())
    }
}

fn record(n: usize) -> ProviderRecord {
    ProviderRecord {
        imdb_id: Some(format!("tt{n:07}")),
        title: Some(format!("Batman Part {n}")),
        year: Some("2005".into()),
        poster: Some("N/A".into()),
        director: Some("Christopher Nolan".into()),
        ..Default::default()
    }
}

/// Serve the real router on an ephemeral port and point a client at it.
async fn spawn_backend(movies: usize) -> Arc<dyn MoviesApi> {
    let catalogue = Catalogue {
        records: (1..=movies)
            .map(record)
            .map(|r| (r.imdb_id.clone().unwrap_or_default(), r))
            .collect(),
    };
    let provider: SharedProvider = Arc::new(catalogue);
    let app = build_router(AppState::new(Some(provider), vec![]));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Arc::new(HttpMoviesApi::new(&format!("http://{addr}/v1/api")).unwrap())
}

#[tokio::test]
async fn search_pages_through_server() {
    let api = spawn_backend(15).await;
    let search = SearchUnit::new(api);

    let first = search.set_query("batman").await;
    assert_eq!(first.results.len(), 10);
    assert_eq!(first.total_results, 15);
    assert!(first.has_next_page);

    assert!(search.fetch_next_page().await.unwrap());
    let all = search.snapshot().await;
    assert_eq!(all.results.len(), 15);
    assert!(!all.has_next_page);
}

#[tokio::test]
async fn unknown_query_is_an_empty_page() {
    let api = spawn_backend(3).await;
    let page = api.search("zzzz", 1).await.unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn favorites_round_trip_through_server() {
    let api = spawn_backend(3).await;
    let favorites = FavoritesUnit::new(api.clone());

    let added = favorites.add("tt0000002").await.unwrap();
    assert_eq!(added.summary.title, "Batman Part 2");
    assert_eq!(added.director.as_deref(), Some("Christopher Nolan"));

    favorites.refetch().await.unwrap();
    assert!(favorites.snapshot().await.is_favorite("tt0000002"));

    let outcome = favorites.remove("tt0000002").await.unwrap();
    assert!(outcome.success);
    assert!(favorites.refetch().await.unwrap().is_empty());

    let again = api.remove_favorite("tt0000002").await.unwrap();
    assert!(!again.success);
}

#[tokio::test]
async fn server_errors_arrive_as_api_errors() {
    let api = spawn_backend(1).await;

    match api.add_favorite("tt9999999").await {
        Err(ClientError::Api { status, code, message }) => {
            assert_eq!(status, 404);
            assert_eq!(code, "not_found");
            assert_eq!(message, "Movie with imdbID tt9999999 not found");
        }
        other => panic!("expected not found, got {other:?}"),
    }

    match api.search("   ", 1).await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 400),
        other => panic!("expected bad request, got {other:?}"),
    }
}
