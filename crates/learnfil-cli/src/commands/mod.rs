//! Subcommand implementations.

pub mod bookmarks;
pub mod certificate;
pub mod complete;
pub mod init;
pub mod lessons;
pub mod modules;
pub mod progress;
pub mod run;
pub mod show;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use learnfil_core::model::{Lesson, ProgressRecord, TestOutcome};
use learnfil_core::store::{FileStore, KeyValueStore};
use learnfil_core::validator::CodeValidator;
use learnfil_core::{LearningEvents, LearningSession, NoopEvents};
use learnfil_runner::NodeEvaluator;

use crate::config::{load_config_from, LearnfilConfig};

/// Console event sink.
struct ConsoleEvents;

impl LearningEvents for ConsoleEvents {
    fn on_tests_complete(&self, lesson: &Lesson, outcomes: &[TestOutcome]) {
        println!("Tests for {}:", lesson.title);
        for outcome in outcomes {
            let icon = if outcome.passed { "PASS" } else { "FAIL" };
            println!("  [{icon}] {}: {}", outcome.description, outcome.message);
        }
    }

    fn on_lesson_completed(&self, lesson: &Lesson, record: &ProgressRecord) {
        println!(
            "Lesson '{}' marked complete ({})",
            lesson.id,
            record.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    fn on_bookmark_toggled(&self, lesson_id: &str, bookmarked: bool) {
        if bookmarked {
            println!("Bookmarked '{lesson_id}'");
        } else {
            println!("Removed bookmark '{lesson_id}'");
        }
    }
}

/// Open the file-backed store named by the config.
pub(crate) fn open_store(config: &LearnfilConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
    Ok(Arc::new(store))
}

/// Load config and open a session for the configured user.
pub(crate) async fn open_session(
    config_path: Option<&Path>,
    verbose_events: bool,
) -> Result<(LearnfilConfig, LearningSession)> {
    let config = load_config_from(config_path)?;
    let store = open_store(&config)?;

    let evaluator = NodeEvaluator::new()
        .with_binary(config.node_binary.clone())
        .with_timeout(config.validator_config().eval_timeout);
    let validator = CodeValidator::new(Arc::new(evaluator), config.validator_config());
    let events: Arc<dyn LearningEvents> = if verbose_events {
        Arc::new(ConsoleEvents)
    } else {
        Arc::new(NoopEvents)
    };

    let session = LearningSession::open(store, &config.identity(), validator, events).await?;
    tracing::debug!(user = %session.user().id, "session opened");
    Ok((config, session))
}

/// Look up a lesson or fail with a helpful message.
pub(crate) async fn require_lesson(session: &LearningSession, lesson_id: &str) -> Result<Lesson> {
    session.lesson(lesson_id).await.with_context(|| {
        format!("unknown lesson '{lesson_id}' (see `learnfil lessons --module <ID>`)")
    })
}
