//! Curriculum repository over the key-value store.
//!
//! Collections are read and written whole: `save_*` overwrites, there is no
//! merge. Callers holding copies must re-read after any save to observe it.

use std::sync::Arc;

use crate::curriculum::Curriculum;
use crate::error::StorageError;
use crate::model::{Lesson, Module};
use crate::store::{load_json, save_json, KeyValueStore, LESSONS_KEY, MODULES_KEY};

/// Which collections a call to [`CurriculumRepository::initialize`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub seeded_modules: bool,
    pub seeded_lessons: bool,
}

/// Read/write access to the module and lesson collections.
#[derive(Clone)]
pub struct CurriculumRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CurriculumRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All modules in stored order.
    pub async fn modules(&self) -> Vec<Module> {
        load_json(self.store.as_ref(), MODULES_KEY).await
    }

    /// Overwrite the module collection.
    pub async fn save_modules(&self, modules: &[Module]) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), MODULES_KEY, modules).await
    }

    /// All lessons in stored order.
    pub async fn lessons(&self) -> Vec<Lesson> {
        load_json(self.store.as_ref(), LESSONS_KEY).await
    }

    /// Overwrite the lesson collection.
    pub async fn save_lessons(&self, lessons: &[Lesson]) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), LESSONS_KEY, lessons).await
    }

    /// Seed the built-in curriculum into whichever collections are empty.
    pub async fn initialize(&self) -> anyhow::Result<SeedOutcome> {
        let curriculum = Curriculum::builtin()?;
        Ok(self.initialize_with(&curriculum).await?)
    }

    /// Seed `curriculum` into whichever collections are empty.
    ///
    /// Each collection is checked independently; existing data is never
    /// overwritten, so repeated calls are no-ops.
    pub async fn initialize_with(&self, curriculum: &Curriculum) -> Result<SeedOutcome, StorageError> {
        let mut outcome = SeedOutcome::default();

        if self.modules().await.is_empty() {
            self.save_modules(&curriculum.modules).await?;
            outcome.seeded_modules = true;
        }
        if self.lessons().await.is_empty() {
            self.save_lessons(&curriculum.lessons).await?;
            outcome.seeded_lessons = true;
        }

        if outcome.seeded_modules || outcome.seeded_lessons {
            tracing::info!(
                modules = curriculum.modules.len(),
                lessons = curriculum.lessons.len(),
                "seeded curriculum ({outcome:?})"
            );
        }
        Ok(outcome)
    }

    /// Modules sorted by order index.
    pub async fn ordered_modules(&self) -> Vec<Module> {
        let mut modules = self.modules().await;
        modules.sort_by_key(|m| m.order_index);
        modules
    }

    /// Look up a module by id.
    pub async fn module(&self, id: &str) -> Option<Module> {
        self.modules().await.into_iter().find(|m| m.id == id)
    }

    /// Look up a lesson by id.
    pub async fn lesson(&self, id: &str) -> Option<Lesson> {
        self.lessons().await.into_iter().find(|l| l.id == id)
    }

    /// Lessons of `module_id`, sorted by order index. Unknown modules yield
    /// an empty list.
    pub async fn lessons_for_module(&self, module_id: &str) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons()
            .await
            .into_iter()
            .filter(|l| l.module_id == module_id)
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }
}
