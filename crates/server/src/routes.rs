use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{delete, get};
use axum::{Json, Router};
use cinefav_core::error::ApiError;
use cinefav_core::types::{MovieDetail, RemoveOutcome, SearchPage};
use cinefav_metadata::SearchService;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/v1/api", api_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(search_movies))
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{imdb_id}", delete(remove_favorite))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    provider_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider_configured: state.search.is_configured(),
    })
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
    page: Option<String>,
}

async fn search_movies(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchPage>, AppError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("query should not be empty".into()))?;
    let page = parse_page(params.page.as_deref())?;

    Ok(Json(state.search.search(&query, page).await?))
}

/// `page` is an optional string of digits naming a page >= 1.
fn parse_page(raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(SearchService::DEFAULT_PAGE);
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest("page must be a number string".into()));
    }

    match raw.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::BadRequest("page must be a positive number".into())),
    }
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AddFavoriteRequest {
    #[serde(rename = "imdbID")]
    imdb_id: String,
}

async fn list_favorites(State(state): State<AppState>) -> Json<Vec<MovieDetail>> {
    Json(state.favorites.list().await)
}

async fn add_favorite(
    State(state): State<AppState>,
    body: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieDetail>), AppError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if body.imdb_id.trim().is_empty() {
        return Err(ApiError::BadRequest("imdbID should not be empty".into()).into());
    }

    let movie = state.favorites.add(&body.imdb_id).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> Json<RemoveOutcome> {
    Json(state.favorites.remove(&imdb_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parsing() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(parse_page(Some("")).is_err());
        assert!(parse_page(Some("0")).is_err());
        assert!(parse_page(Some("-1")).is_err());
        assert!(parse_page(Some("2.5")).is_err());
        assert!(parse_page(Some("abc")).is_err());
        assert!(parse_page(Some("99999999999")).is_err());
    }
}
