//! The `learnfil run` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::commands::{open_session, require_lesson};

pub async fn execute(
    lesson_id: String,
    file: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let code = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let (_, mut session) = open_session(config_path.as_deref(), true).await?;
    let lesson = require_lesson(&session, &lesson_id).await?;

    if lesson.validation_tests.is_empty() {
        eprintln!("No tests for this lesson; submitting completes it.");
    } else {
        eprintln!("Running {} tests...", lesson.validation_tests.len());
    }
    let Some(outcome) = session.run_code(&lesson.id, &code).await? else {
        anyhow::bail!("lesson '{lesson_id}' disappeared while running");
    };
    tracing::debug!(run_id = %outcome.run_id, passed = outcome.passed_count(), "run finished");

    println!(
        "\n{}/{} tests passed",
        outcome.passed_count(),
        outcome.outcomes.len()
    );
    if outcome.all_passed() {
        if !outcome.newly_completed {
            println!("Lesson was already complete.");
        }
        if let Some(next) = session.next_lesson(&lesson.id).await {
            println!("Next: {} ({})", next.title, next.id);
        } else if session.all_modules_completed().await {
            println!("Every module is complete. Run `learnfil certificate` to claim yours.");
        }
    }

    Ok(())
}
