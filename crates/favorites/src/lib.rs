pub mod store;

use cinefav_core::error::ApiError;
use cinefav_metadata::ServiceError;
use thiserror::Error;

pub use store::{DetailLookup, FavoritesStore};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    #[error("Movie with imdbID {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Lookup(#[from] ServiceError),
}

impl From<FavoritesError> for ApiError {
    fn from(e: FavoritesError) -> Self {
        match e {
            FavoritesError::NotFound(_) => ApiError::NotFound(e.to_string()),
            FavoritesError::Lookup(inner) => inner.into(),
        }
    }
}
