pub mod detail;
pub mod omdb;
pub mod provider;
pub mod search;

use cinefav_core::error::ApiError;
use thiserror::Error;

pub use detail::DetailService;
pub use omdb::OmdbClient;
pub use provider::{MovieProvider, ProviderRecord, ProviderSearchPayload, SharedProvider};
pub use search::SearchService;

/// Failure talking to the upstream provider.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Failure of a search or lookup as seen by callers of the services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("OMDb API key is not configured")]
    Configuration,
    #[error("{0}")]
    Upstream(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ServiceError::Configuration => ApiError::Internal(e.to_string()),
            ServiceError::Upstream(msg) => ApiError::Internal(msg),
        }
    }
}

/// Shared input check for query strings and identifiers.
pub(crate) fn require_non_blank(value: &str, message: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(message.to_string()));
    }
    Ok(())
}
