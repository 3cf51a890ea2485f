//! The `learnfil lessons` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::commands::open_session;

pub async fn execute(module_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), false).await?;

    let Some(module) = session.repository().module(&module_id).await else {
        anyhow::bail!("unknown module '{module_id}' (see `learnfil modules`)");
    };
    let lessons = session.lessons_for_module(&module.id).await;
    let bookmarks = session.bookmarks().await;

    println!("{}", module.title);
    if !module.description.is_empty() {
        println!("{}", module.description);
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Lesson", "Title", "Exercise", "Done", "Bookmark"]);
    for lesson in &lessons {
        let mark = |on: bool| if on { "yes" } else { "" };
        table.add_row(vec![
            Cell::new(lesson.order_index),
            Cell::new(&lesson.id),
            Cell::new(&lesson.title),
            Cell::new(if lesson.has_exercise() {
                format!("{} tests", lesson.validation_tests.len())
            } else {
                "reading".to_string()
            }),
            Cell::new(mark(session.is_lesson_complete(&lesson.id))),
            Cell::new(mark(bookmarks.contains(&lesson.id))),
        ]);
    }

    println!("{table}");
    Ok(())
}
