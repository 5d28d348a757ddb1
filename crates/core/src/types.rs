use serde::{Deserialize, Serialize};

/// Marker the provider uses for a missing poster.
pub const POSTER_ABSENT: &str = "N/A";

/// A search hit. Field names follow the provider's casing, which is also the
/// wire format of the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

impl MovieSummary {
    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty() && self.poster != POSTER_ABSENT
    }
}

/// Full record for a single movie. Optional fields are omitted from JSON
/// when the provider did not supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
}

impl MovieDetail {
    pub fn imdb_id(&self) -> &str {
        &self.summary.imdb_id
    }

    /// Genres split on the provider's comma separator.
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|g| g.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// One page of search results plus the provider-reported total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<MovieSummary>,
    #[serde(rename = "totalResults")]
    pub total_results: u64,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

pub const REMOVED_MESSAGE: &str = "Favorite removed successfully";
pub const NOT_PRESENT_MESSAGE: &str = "Movie was not in favorites";

/// Result of removing a favorite. Removal always succeeds; the message says
/// whether an entry actually existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOutcome {
    pub success: bool,
    pub message: String,
}

impl RemoveOutcome {
    pub fn removed() -> Self {
        Self {
            success: true,
            message: REMOVED_MESSAGE.to_string(),
        }
    }

    pub fn not_present() -> Self {
        Self {
            success: true,
            message: NOT_PRESENT_MESSAGE.to_string(),
        }
    }

    pub fn was_present(&self) -> bool {
        self.message == REMOVED_MESSAGE
    }
}
