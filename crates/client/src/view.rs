//! View models for the search and favorites pages, rendered as plain text.
//!
//! Every page state maps to exactly one view: loading, error, empty and
//! populated are never shown together.

use std::fmt;

use cinefav_core::types::{MovieDetail, MovieSummary, POSTER_ABSENT};

use crate::cache::QueryState;
use crate::favorites::FavoritesSnapshot;
use crate::search::SearchSnapshot;

pub const PLACEHOLDER_POSTER: &str = "/placeholder-poster.svg";

/// Poster to display, falling back when the provider has none.
pub fn poster_src<'a>(poster: &'a str, fallback: &'a str) -> &'a str {
    if poster.is_empty() || poster == POSTER_ABSENT {
        fallback
    } else {
        poster
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonVariant {
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub variant: ButtonVariant,
    pub is_loading: bool,
}

impl Button {
    pub fn is_disabled(&self) -> bool {
        self.is_loading
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_loading {
            write!(f, "[Loading...]")
        } else {
            write!(f, "[{}]", self.label)
        }
    }
}

pub fn favorite_button(is_favorite: bool, is_loading: bool) -> Button {
    let (label, variant) = if is_favorite {
        ("Remove", ButtonVariant::Danger)
    } else {
        ("Add to Favorites", ButtonVariant::Primary)
    };
    Button {
        label: label.to_string(),
        variant,
        is_loading,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub genre: Option<String>,
    pub director: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub plot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub details: Option<CardDetails>,
    pub button: Button,
}

impl MovieCard {
    pub fn from_summary(movie: &MovieSummary, favorites: &FavoritesSnapshot) -> Self {
        Self {
            imdb_id: movie.imdb_id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            poster: poster_src(&movie.poster, PLACEHOLDER_POSTER).to_string(),
            details: None,
            button: favorite_button(
                favorites.is_favorite(&movie.imdb_id),
                favorites.is_mutating(),
            ),
        }
    }

    pub fn with_details(movie: &MovieDetail, favorites: &FavoritesSnapshot) -> Self {
        Self {
            details: Some(CardDetails {
                genre: movie.genre.clone(),
                director: movie.director.clone(),
                runtime: movie.runtime.clone(),
                rating: movie.imdb_rating.clone(),
                plot: movie.plot.clone(),
            }),
            ..Self::from_summary(&movie.summary, favorites)
        }
    }
}

impl fmt::Display for MovieCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})  [{}]", self.title, self.year, self.imdb_id)?;
        writeln!(f, "  poster: {}", self.poster)?;
        if let Some(d) = &self.details {
            if let Some(genre) = &d.genre {
                writeln!(f, "  Genre: {genre}")?;
            }
            if let Some(director) = &d.director {
                writeln!(f, "  Director: {director}")?;
            }
            if let Some(runtime) = &d.runtime {
                writeln!(f, "  Runtime: {runtime}")?;
            }
            if let Some(rating) = &d.rating {
                writeln!(f, "  Rating: {rating}/10")?;
            }
            if let Some(plot) = &d.plot {
                writeln!(f, "  Plot: {plot}")?;
            }
        }
        write!(f, "  {}", self.button)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub description: String,
    pub action: Option<(String, String)>,
}

impl fmt::Display for EmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.description)?;
        if let Some((label, href)) = &self.action {
            write!(f, "\n-> {label} ({href})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub title: String,
    pub message: String,
}

impl ErrorState {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            message: "Please try again later".to_string(),
        }
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "! {}\n  {}", self.title, self.message)
    }
}

// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFooter {
    LoadingMore,
    More,
    LoadFailed,
    RefreshFailed,
    EndOfResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    Prompt(EmptyState),
    Loading,
    Error(ErrorState),
    NoResults(EmptyState),
    Results {
        cards: Vec<MovieCard>,
        footer: ListFooter,
    },
}

pub fn search_view(search: &SearchSnapshot, favorites: &FavoritesSnapshot) -> SearchView {
    let Some(query) = &search.query else {
        return SearchView::Prompt(EmptyState {
            title: "Discover Amazing Movies".to_string(),
            description: "Start searching for your favorite movies above".to_string(),
            action: None,
        });
    };

    if search.results.is_empty() {
        return match search.state {
            QueryState::Idle | QueryState::Loading => SearchView::Loading,
            QueryState::Error => SearchView::Error(ErrorState::new("Error loading movies")),
            QueryState::Success => SearchView::NoResults(EmptyState {
                title: format!("No movies found for \"{query}\""),
                description: "Try searching with different keywords".to_string(),
                action: None,
            }),
        };
    }

    let footer = if search.is_fetching_next_page {
        ListFooter::LoadingMore
    } else if search.state == QueryState::Error && search.next_page_failed {
        ListFooter::LoadFailed
    } else if search.state == QueryState::Error {
        ListFooter::RefreshFailed
    } else if search.has_next_page {
        ListFooter::More
    } else {
        ListFooter::EndOfResults
    };

    SearchView::Results {
        cards: search
            .results
            .iter()
            .map(|m| MovieCard::from_summary(m, favorites))
            .collect(),
        footer,
    }
}

impl fmt::Display for SearchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(empty) | Self::NoResults(empty) => write!(f, "{empty}"),
            Self::Loading => write!(f, "Searching for movies..."),
            Self::Error(err) => write!(f, "{err}"),
            Self::Results { cards, footer } => {
                for card in cards {
                    writeln!(f, "{card}")?;
                }
                match footer {
                    ListFooter::LoadingMore => write!(f, "Loading more movies..."),
                    ListFooter::More => write!(f, "More results available"),
                    ListFooter::LoadFailed => write!(f, "Could not load more movies"),
                    ListFooter::RefreshFailed => write!(f, "Could not refresh these results"),
                    ListFooter::EndOfResults => write!(f, "You've reached the end of the results"),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Favorites page
// ---------------------------------------------------------------------------

pub fn count_text(count: usize) -> String {
    match count {
        0 => "No favorites yet".to_string(),
        1 => "1 movie saved".to_string(),
        n => format!("{n} movies saved"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesView {
    Loading,
    Error(ErrorState),
    Empty(EmptyState),
    List {
        count_text: String,
        cards: Vec<MovieCard>,
    },
}

pub fn favorites_view(favorites: &FavoritesSnapshot) -> FavoritesView {
    match favorites.state {
        QueryState::Idle | QueryState::Loading => FavoritesView::Loading,
        QueryState::Error => FavoritesView::Error(ErrorState::new("Error loading favorites")),
        QueryState::Success if favorites.favorites.is_empty() => FavoritesView::Empty(EmptyState {
            title: "No Favorites Yet".to_string(),
            description: "Start building your collection of favorite movies".to_string(),
            action: Some(("Explore Movies".to_string(), "/search".to_string())),
        }),
        QueryState::Success => FavoritesView::List {
            count_text: count_text(favorites.favorites.len()),
            cards: favorites
                .favorites
                .iter()
                .map(|m| MovieCard::with_details(m, favorites))
                .collect(),
        },
    }
}

impl fmt::Display for FavoritesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "My Favorites")?;
        match self {
            Self::Loading => write!(f, "Loading your favorites..."),
            Self::Error(err) => write!(f, "{err}"),
            Self::Empty(empty) => write!(f, "{}\n{empty}", count_text(0)),
            Self::List { count_text, cards } => {
                write!(f, "{count_text}")?;
                for card in cards {
                    write!(f, "\n{card}")?;
                }
                Ok(())
            }
        }
    }
}
