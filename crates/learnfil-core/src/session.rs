//! Learning session orchestrator.
//!
//! Ties the repository, progress tracker, bookmark store, and validator
//! together for one user. This is the only entry point front ends need:
//! run code, record completions, and query module progress.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::bookmarks::BookmarkStore;
use crate::error::StorageError;
use crate::model::{Lesson, Module, ModuleSummary, ProgressRecord, TestOutcome};
use crate::progress::ProgressTracker;
use crate::repository::CurriculumRepository;
use crate::store::KeyValueStore;
use crate::traits::{IdentityProvider, UserIdentity};
use crate::validator::{all_passed, CodeValidator};

/// Observer for session mutations.
///
/// Sessions do not push fresh state to readers; a front end either
/// implements this trait or re-queries after each mutating call.
pub trait LearningEvents: Send + Sync {
    fn on_tests_complete(&self, lesson: &Lesson, outcomes: &[TestOutcome]);
    fn on_lesson_completed(&self, lesson: &Lesson, record: &ProgressRecord);
    fn on_bookmark_toggled(&self, lesson_id: &str, bookmarked: bool);
}

/// No-op event sink.
pub struct NoopEvents;

impl LearningEvents for NoopEvents {
    fn on_tests_complete(&self, _: &Lesson, _: &[TestOutcome]) {}
    fn on_lesson_completed(&self, _: &Lesson, _: &ProgressRecord) {}
    fn on_bookmark_toggled(&self, _: &str, _: bool) {}
}

/// Result of running learner code for a lesson.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Identifier for this run, attached to log lines.
    pub run_id: Uuid,
    pub lesson_id: String,
    pub outcomes: Vec<TestOutcome>,
    /// This run completed the lesson for the first time.
    pub newly_completed: bool,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn all_passed(&self) -> bool {
        all_passed(&self.outcomes)
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }
}

/// One user's view of the curriculum.
pub struct LearningSession {
    user: UserIdentity,
    repository: CurriculumRepository,
    progress: ProgressTracker,
    bookmarks: BookmarkStore,
    validator: CodeValidator,
    events: Arc<dyn LearningEvents>,
}

impl LearningSession {
    /// Open a session: seed the curriculum if needed and load the current
    /// user's progress.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        identity: &dyn IdentityProvider,
        validator: CodeValidator,
        events: Arc<dyn LearningEvents>,
    ) -> Result<Self> {
        let repository = CurriculumRepository::new(Arc::clone(&store));
        repository.initialize().await?;

        let user = identity.resolve();
        let progress = ProgressTracker::load(Arc::clone(&store), user.id.clone()).await;
        let bookmarks = BookmarkStore::new(store);

        Ok(Self {
            user,
            repository,
            progress,
            bookmarks,
            validator,
            events,
        })
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn repository(&self) -> &CurriculumRepository {
        &self.repository
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    // -----------------------------------------------------------------------
    // Curriculum queries
    // -----------------------------------------------------------------------

    pub async fn modules(&self) -> Vec<Module> {
        self.repository.ordered_modules().await
    }

    pub async fn lessons_for_module(&self, module_id: &str) -> Vec<Lesson> {
        self.repository.lessons_for_module(module_id).await
    }

    pub async fn lesson(&self, lesson_id: &str) -> Option<Lesson> {
        self.repository.lesson(lesson_id).await
    }

    pub fn is_lesson_complete(&self, lesson_id: &str) -> bool {
        self.progress.is_lesson_complete(lesson_id)
    }

    /// Completion counts for every module, in module order.
    pub async fn module_overview(&self) -> Vec<ModuleSummary> {
        let lessons = self.repository.lessons().await;
        self.modules()
            .await
            .into_iter()
            .map(|module| {
                let owned: Vec<&Lesson> =
                    lessons.iter().filter(|l| l.module_id == module.id).collect();
                let completed_lessons = owned
                    .iter()
                    .filter(|l| self.progress.is_lesson_complete(&l.id))
                    .count();
                ModuleSummary {
                    total_lessons: owned.len(),
                    completed_lessons,
                    module,
                }
            })
            .collect()
    }

    /// Completion counts for a single module.
    pub async fn module_summary(&self, module_id: &str) -> Option<ModuleSummary> {
        self.module_overview()
            .await
            .into_iter()
            .find(|s| s.module.id == module_id)
    }

    /// True iff at least one module exists and every lesson of every module
    /// is complete.
    pub async fn all_modules_completed(&self) -> bool {
        let overview = self.module_overview().await;
        !overview.is_empty() && overview.iter().all(ModuleSummary::is_complete)
    }

    /// The lesson after `lesson_id` within its module, if any.
    pub async fn next_lesson(&self, lesson_id: &str) -> Option<Lesson> {
        let lesson = self.lesson(lesson_id).await?;
        let siblings = self.lessons_for_module(&lesson.module_id).await;
        let index = siblings.iter().position(|l| l.id == lesson.id)?;
        siblings.into_iter().nth(index + 1)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Grade `code` against the lesson's tests. When every test passes and
    /// the lesson was not yet complete, record the completion.
    ///
    /// Returns `Ok(None)` for an unknown lesson.
    pub async fn run_code(
        &mut self,
        lesson_id: &str,
        code: &str,
    ) -> Result<Option<RunOutcome>, StorageError> {
        let Some(lesson) = self.lesson(lesson_id).await else {
            tracing::warn!("run requested for unknown lesson '{lesson_id}'");
            return Ok(None);
        };

        let run_id = Uuid::new_v4();
        tracing::debug!(%run_id, lesson = lesson_id, tests = lesson.validation_tests.len(), "running tests");

        let outcomes = self.validator.run(code, &lesson.validation_tests).await;
        self.events.on_tests_complete(&lesson, &outcomes);

        let mut newly_completed = false;
        if all_passed(&outcomes) && !self.progress.is_lesson_complete(lesson_id) {
            let record = self.progress.mark_lesson_complete(lesson_id, code).await?;
            self.events.on_lesson_completed(&lesson, &record);
            newly_completed = true;
        }

        Ok(Some(RunOutcome {
            run_id,
            lesson_id: lesson.id,
            outcomes,
            newly_completed,
            finished_at: Utc::now(),
        }))
    }

    /// Record `lesson_id` as complete without running tests.
    ///
    /// Returns `Ok(None)` for an unknown lesson.
    pub async fn mark_complete(
        &mut self,
        lesson_id: &str,
        code: &str,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let Some(lesson) = self.lesson(lesson_id).await else {
            return Ok(None);
        };
        let record = self.progress.mark_lesson_complete(lesson_id, code).await?;
        self.events.on_lesson_completed(&lesson, &record);
        Ok(Some(record))
    }

    pub async fn is_bookmarked(&self, lesson_id: &str) -> bool {
        self.bookmarks.is_bookmarked(lesson_id).await
    }

    pub async fn bookmarks(&self) -> Vec<String> {
        self.bookmarks.list().await
    }

    /// Toggle the bookmark for `lesson_id`, returning the new state.
    pub async fn toggle_bookmark(&self, lesson_id: &str) -> Result<bool, StorageError> {
        let bookmarked = self.bookmarks.toggle(lesson_id).await?;
        self.events.on_bookmark_toggled(lesson_id, bookmarked);
        Ok(bookmarked)
    }
}
