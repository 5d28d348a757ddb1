use std::sync::Arc;

use cinefav_favorites::FavoritesStore;
use cinefav_metadata::{DetailService, SearchService, SharedProvider};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub favorites: FavoritesStore,
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Wire services around one provider. `None` means no API key was
    /// configured.
    pub fn new(provider: Option<SharedProvider>, allowed_origins: Vec<String>) -> Self {
        let detail = DetailService::new(provider.clone());
        Self {
            search: SearchService::new(provider),
            favorites: FavoritesStore::new(Arc::new(detail)),
            allowed_origins,
        }
    }
}
