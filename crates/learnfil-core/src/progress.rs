//! Per-user lesson progress.
//!
//! The persisted layout is `{ user_id: { lesson_id: ProgressRecord } }`
//! under [`PROGRESS_KEY`]. A tracker holds one user's slice in memory and
//! writes through to the store on every completion.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;

use crate::error::StorageError;
use crate::model::ProgressRecord;
use crate::store::{load_json, save_json, KeyValueStore, PROGRESS_KEY};

type UserProgress = BTreeMap<String, ProgressRecord>;
type ProgressCollection = BTreeMap<String, UserProgress>;

/// Tracks which lessons one user has completed.
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    user_id: String,
    records: UserProgress,
}

impl ProgressTracker {
    /// Load `user_id`'s progress from the store.
    pub async fn load(store: Arc<dyn KeyValueStore>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let mut all: ProgressCollection = load_json(store.as_ref(), PROGRESS_KEY).await;
        let records = all.remove(&user_id).unwrap_or_default();
        tracing::debug!(user = %user_id, completed = records.len(), "loaded progress");
        Self {
            store,
            user_id,
            records,
        }
    }

    /// The user this tracker belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// True iff a completion record exists for `lesson_id`.
    pub fn is_lesson_complete(&self, lesson_id: &str) -> bool {
        self.records
            .get(lesson_id)
            .is_some_and(|record| record.completed)
    }

    /// Snapshot of all completed lesson ids.
    pub fn completed_lesson_ids(&self) -> BTreeSet<String> {
        self.records
            .values()
            .filter(|r| r.completed)
            .map(|r| r.lesson_id.clone())
            .collect()
    }

    /// The stored record for `lesson_id`, if any.
    pub fn record(&self, lesson_id: &str) -> Option<&ProgressRecord> {
        self.records.get(lesson_id)
    }

    /// Mark `lesson_id` complete with the submitted `code`.
    ///
    /// Upserts: marking an already-complete lesson replaces its code and
    /// timestamp and never creates a second record. The store is re-read so
    /// other users' progress is preserved. If the write fails the in-memory
    /// view is unchanged.
    pub async fn mark_lesson_complete(
        &mut self,
        lesson_id: &str,
        code: &str,
    ) -> Result<ProgressRecord, StorageError> {
        let record = ProgressRecord {
            lesson_id: lesson_id.to_string(),
            completed: true,
            completed_at: Utc::now(),
            code: code.to_string(),
        };

        let mut all: ProgressCollection = load_json(self.store.as_ref(), PROGRESS_KEY).await;
        let mut mine = self.records.clone();
        // Records written by another tracker for the same user since load.
        if let Some(stored) = all.remove(&self.user_id) {
            for (id, r) in stored {
                mine.entry(id).or_insert(r);
            }
        }
        mine.insert(lesson_id.to_string(), record.clone());
        all.insert(self.user_id.clone(), mine.clone());

        save_json(self.store.as_ref(), PROGRESS_KEY, &all).await?;

        self.records = mine;
        tracing::info!(user = %self.user_id, lesson = lesson_id, "lesson marked complete");
        Ok(record)
    }

    /// Re-read this user's progress from the store.
    pub async fn reload(&mut self) {
        let mut all: ProgressCollection = load_json(self.store.as_ref(), PROGRESS_KEY).await;
        self.records = all.remove(&self.user_id).unwrap_or_default();
    }
}
