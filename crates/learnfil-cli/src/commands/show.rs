//! The `learnfil show` command.

use std::path::PathBuf;

use anyhow::Result;

use learnfil_core::model::Check;

use crate::commands::{open_session, require_lesson};

pub async fn execute(lesson_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), false).await?;
    let lesson = require_lesson(&session, &lesson_id).await?;

    let mut flags = Vec::new();
    if let Some(record) = session.progress().record(&lesson.id) {
        flags.push(format!(
            "completed {}",
            record.completed_at.format("%Y-%m-%d")
        ));
    }
    if session.is_bookmarked(&lesson.id).await {
        flags.push("bookmarked".to_string());
    }

    println!("{}", lesson.title);
    println!("{}", "=".repeat(lesson.title.chars().count()));
    if !flags.is_empty() {
        println!("({})", flags.join(", "));
    }
    println!("{}", lesson.body().trim());

    if !lesson.starter_code.trim().is_empty() {
        println!("\nStarter code:\n");
        for line in lesson.starter_code.lines() {
            println!("    {line}");
        }
    }

    if !lesson.validation_tests.is_empty() {
        println!("\nTests:");
        for test in &lesson.validation_tests {
            let kind = match test.check {
                Check::Contains { .. } => "source",
                Check::Evaluate { .. } => "runs code",
            };
            println!("  - {} ({kind})", test.description);
        }
        println!("\nSubmit with: learnfil run --lesson {} --file <FILE>", lesson.id);
    }

    if let Some(next) = session.next_lesson(&lesson.id).await {
        println!("\nNext: {} ({})", next.title, next.id);
    }

    Ok(())
}
