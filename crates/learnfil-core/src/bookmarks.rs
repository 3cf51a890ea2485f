//! Bookmarked lessons.
//!
//! Bookmarks are a single ordered list of lesson ids per store, not per
//! user. Every operation reads the list from the store, so there is no
//! in-memory copy to go stale.

use std::sync::Arc;

use crate::error::StorageError;
use crate::store::{load_json, save_json, KeyValueStore, BOOKMARKS_KEY};

#[derive(Clone)]
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Bookmarked lesson ids in the order they were added.
    pub async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = load_json(self.store.as_ref(), BOOKMARKS_KEY).await;
        // Hand-edited data may carry duplicates.
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        ids
    }

    pub async fn is_bookmarked(&self, lesson_id: &str) -> bool {
        self.list().await.iter().any(|id| id == lesson_id)
    }

    /// Flip membership of `lesson_id` and return the new state.
    pub async fn toggle(&self, lesson_id: &str) -> Result<bool, StorageError> {
        let mut ids = self.list().await;
        let bookmarked = if let Some(pos) = ids.iter().position(|id| id == lesson_id) {
            ids.remove(pos);
            false
        } else {
            ids.push(lesson_id.to_string());
            true
        };

        save_json(self.store.as_ref(), BOOKMARKS_KEY, &ids).await?;
        tracing::debug!(lesson = lesson_id, bookmarked, "toggled bookmark");
        Ok(bookmarked)
    }
}
