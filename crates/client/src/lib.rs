//! Client side of cinefav: remote-data units over the HTTP API, timer and
//! scroll primitives, and view models for the search and favorites pages.

pub mod api;
pub mod cache;
pub mod debounce;
pub mod favorites;
pub mod screen;
pub mod scroll;
pub mod search;
pub mod session;
pub mod view;

#[cfg(test)]
mod testing;

use thiserror::Error;

pub use api::{HttpMoviesApi, MoviesApi};
pub use favorites::FavoritesUnit;
pub use search::SearchUnit;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{message} ({status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("decode error: {0}")]
    Decode(String),
}
