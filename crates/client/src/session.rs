//! Session-scoped key/value storage for client state that should survive
//! navigation but not a restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key under which the last search query is kept.
pub const SEARCH_QUERY_KEY: &str = "movieSearchQuery";

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let storage = MemorySessionStorage::new();
        let other = storage.clone();

        storage.set(SEARCH_QUERY_KEY, "batman");
        assert_eq!(other.get(SEARCH_QUERY_KEY).as_deref(), Some("batman"));

        other.remove(SEARCH_QUERY_KEY);
        assert_eq!(storage.get(SEARCH_QUERY_KEY), None);
    }
}
