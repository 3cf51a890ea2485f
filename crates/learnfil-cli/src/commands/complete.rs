//! The `learnfil complete` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::commands::{open_session, require_lesson};

pub async fn execute(
    lesson_id: String,
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let code = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };

    let (_, mut session) = open_session(config_path.as_deref(), true).await?;
    let lesson = require_lesson(&session, &lesson_id).await?;
    session.mark_complete(&lesson.id, &code).await?;

    if let Some(summary) = session.module_summary(&lesson.module_id).await {
        println!(
            "{}: {}/{} lessons complete",
            summary.module.title, summary.completed_lessons, summary.total_lessons
        );
    }
    Ok(())
}
