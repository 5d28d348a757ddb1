//! Page controllers tying the data units to input primitives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::ClientError;
use crate::debounce::Debouncer;
use crate::favorites::FavoritesUnit;
use crate::scroll::ScrollTrigger;
use crate::search::SearchUnit;
use crate::session::{SEARCH_QUERY_KEY, SessionStorage};
use crate::view::{FavoritesView, SearchView, favorites_view, search_view};

/// Text input whose edits reach the search only after typing pauses.
pub struct SearchBox {
    text: String,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(initial: &str, window: Duration, output: mpsc::UnboundedSender<String>) -> Self {
        Self {
            text: initial.to_string(),
            debouncer: Debouncer::spawn(window, output),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn type_text(&mut self, input: &str) {
        self.text.push_str(input);
        self.debouncer.push(self.text.clone());
    }

    pub fn backspace(&mut self) {
        if self.text.pop().is_some() {
            self.debouncer.push(self.text.clone());
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.debouncer.push(self.text.clone());
    }
}

pub struct SearchScreen {
    search: SearchUnit,
    favorites: FavoritesUnit,
    session: Arc<dyn SessionStorage>,
    trigger: ScrollTrigger,
}

impl SearchScreen {
    pub fn new(search: SearchUnit, favorites: FavoritesUnit, session: Arc<dyn SessionStorage>) -> Self {
        Self {
            search,
            favorites,
            session,
            trigger: ScrollTrigger::default(),
        }
    }

    /// Query left behind earlier in this session, if any.
    pub fn initial_query(&self) -> String {
        self.session.get(SEARCH_QUERY_KEY).unwrap_or_default()
    }

    pub async fn submit(&self, query: &str) -> SearchView {
        self.session.set(SEARCH_QUERY_KEY, query);
        self.search.set_query(query).await;
        self.render().await
    }

    /// Run submitted queries until every sender of `queries` is gone.
    pub async fn drive(&self, mut queries: mpsc::UnboundedReceiver<String>) {
        while let Some(query) = queries.recv().await {
            debug!(query = %query, "debounced search");
            self.submit(&query).await;
        }
    }

    /// The end-of-list sentinel reported `ratio` visibility.
    pub async fn on_sentinel(&self, ratio: f32) -> Result<bool, ClientError> {
        if !self.trigger.observe(ratio) {
            return Ok(false);
        }
        self.search.fetch_next_page().await
    }

    /// A card's favorite button was pressed.
    pub async fn toggle(&self, imdb_id: &str) -> Result<SearchView, ClientError> {
        self.favorites.toggle(imdb_id).await?;
        let _ = self.favorites.refetch().await;
        Ok(self.render().await)
    }

    pub async fn render(&self) -> SearchView {
        search_view(&self.search.snapshot().await, &self.favorites.snapshot().await)
    }

    pub fn teardown(&self) {
        self.trigger.disconnect();
    }
}

impl Drop for SearchScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub struct FavoritesScreen {
    favorites: FavoritesUnit,
}

impl FavoritesScreen {
    pub fn new(favorites: FavoritesUnit) -> Self {
        Self { favorites }
    }

    pub async fn open(&self) -> FavoritesView {
        favorites_view(&self.favorites.load().await)
    }

    pub async fn toggle(&self, imdb_id: &str) -> Result<FavoritesView, ClientError> {
        self.favorites.toggle(imdb_id).await?;
        // The list on screen is invalidated by the mutation; show it refetched.
        let _ = self.favorites.refetch().await;
        Ok(favorites_view(&self.favorites.snapshot().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::DEFAULT_DEBOUNCE;
    use crate::session::MemorySessionStorage;
    use crate::testing::{FakeApi, detail, page_of};
    use crate::view::ListFooter;

    fn screen(api: &Arc<FakeApi>, session: &MemorySessionStorage) -> SearchScreen {
        SearchScreen::new(
            SearchUnit::new(api.clone()),
            FavoritesUnit::new(api.clone()),
            Arc::new(session.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_typing_sends_one_search() {
        let api = FakeApi::new();
        api.set_pages("batman", vec![page_of("batman", 1, 1, 1)]);
        let session = MemorySessionStorage::new();
        let screen = Arc::new(screen(&api, &session));

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = {
            let screen = screen.clone();
            tokio::spawn(async move { screen.drive(rx).await })
        };

        let mut search_box = SearchBox::new("", DEFAULT_DEBOUNCE, tx);
        search_box.type_text("bat");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search_box.type_text("man");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(search_box.text(), "batman");
        assert_eq!(api.search_calls(), vec![("batman".to_string(), 1)]);
        assert_eq!(session.get(SEARCH_QUERY_KEY).as_deref(), Some("batman"));

        drop(search_box);
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn query_survives_in_session() {
        let api = FakeApi::new();
        let session = MemorySessionStorage::new();

        screen(&api, &session).submit("alien").await;
        assert_eq!(screen(&api, &session).initial_query(), "alien");
    }

    #[tokio::test]
    async fn sentinel_loads_more_until_end() {
        let api = FakeApi::new();
        api.set_pages(
            "star",
            vec![page_of("star", 1, 10, 15), page_of("star", 2, 5, 15)],
        );
        let screen = screen(&api, &MemorySessionStorage::new());

        let SearchView::Results { footer, .. } = screen.submit("star").await else {
            panic!("expected results");
        };
        assert_eq!(footer, ListFooter::More);

        assert!(!screen.on_sentinel(0.0).await.unwrap());
        assert!(screen.on_sentinel(0.5).await.unwrap());
        assert!(!screen.on_sentinel(1.0).await.unwrap());

        let SearchView::Results { cards, footer } = screen.render().await else {
            panic!("expected results");
        };
        assert_eq!(cards.len(), 15);
        assert_eq!(footer, ListFooter::EndOfResults);
        assert_eq!(api.search_calls().len(), 2);
    }

    #[tokio::test]
    async fn torn_down_screen_stops_paginating() {
        let api = FakeApi::new();
        api.set_pages(
            "star",
            vec![page_of("star", 1, 10, 15), page_of("star", 2, 5, 15)],
        );
        let screen = screen(&api, &MemorySessionStorage::new());
        screen.submit("star").await;

        screen.teardown();
        assert!(!screen.on_sentinel(1.0).await.unwrap());
        assert_eq!(api.search_calls().len(), 1);
    }

    #[tokio::test]
    async fn search_cards_toggle_their_favorite() {
        let api = FakeApi::new();
        let movie = detail("tt0372784", "Batman Begins");
        api.set_pages(
            "batman",
            vec![cinefav_core::types::SearchPage {
                results: vec![movie.summary.clone()],
                total_results: 1,
            }],
        );
        api.add_to_catalogue(movie);
        let screen = screen(&api, &MemorySessionStorage::new());
        screen.submit("batman").await;

        let label = |view: SearchView| match view {
            SearchView::Results { cards, .. } => cards[0].button.label.clone(),
            other => panic!("expected results, got {other:?}"),
        };
        assert_eq!(label(screen.toggle("tt0372784").await.unwrap()), "Remove");
        assert_eq!(
            label(screen.toggle("tt0372784").await.unwrap()),
            "Add to Favorites"
        );
    }

    #[tokio::test]
    async fn favorites_screen_toggles() {
        let api = FakeApi::new();
        api.add_to_catalogue(detail("tt0372784", "Batman Begins"));
        let favorites = FavoritesScreen::new(FavoritesUnit::new(api.clone()));

        assert!(matches!(favorites.open().await, FavoritesView::Empty(_)));

        let FavoritesView::List { count_text, .. } = favorites.toggle("tt0372784").await.unwrap()
        else {
            panic!("expected list");
        };
        assert_eq!(count_text, "1 movie saved");

        assert!(matches!(
            favorites.toggle("tt0372784").await.unwrap(),
            FavoritesView::Empty(_)
        ));
    }
}
