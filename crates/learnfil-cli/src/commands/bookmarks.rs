//! The `learnfil bookmark` and `learnfil bookmarks` commands.

use std::path::PathBuf;

use anyhow::Result;

use crate::commands::{open_session, require_lesson};

/// Toggle the bookmark on a lesson.
pub async fn toggle(lesson_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), true).await?;
    let lesson = require_lesson(&session, &lesson_id).await?;
    session.toggle_bookmark(&lesson.id).await?;
    Ok(())
}

/// List bookmarked lessons in the order they were added.
pub async fn list(config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), false).await?;
    let bookmarks = session.bookmarks().await;

    if bookmarks.is_empty() {
        println!("No bookmarks.");
        return Ok(());
    }

    for id in &bookmarks {
        match session.lesson(id).await {
            Some(lesson) => println!("  {} ({})", lesson.title, lesson.id),
            None => println!("  {id} (not in curriculum)"),
        }
    }
    Ok(())
}
