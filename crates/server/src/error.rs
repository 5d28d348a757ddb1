use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinefav_core::error::{ApiError, ErrorEnvelope};
use cinefav_favorites::FavoritesError;
use cinefav_metadata::ServiceError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        Self(e.into())
    }
}

impl From<FavoritesError> for AppError {
    fn from(e: FavoritesError) -> Self {
        Self(e.into())
    }
}
