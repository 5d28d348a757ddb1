pub mod error;
pub mod types;

pub use types::{MovieDetail, MovieSummary, RemoveOutcome, SearchPage};
