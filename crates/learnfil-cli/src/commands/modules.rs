//! The `learnfil modules` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::commands::open_session;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), false).await?;
    let overview = session.module_overview().await;

    if overview.is_empty() {
        println!("No modules found. Run `learnfil init` first.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Module", "Title", "Lessons", "Status"]);
    for (i, summary) in overview.iter().enumerate() {
        let status = if summary.total_lessons > 0 && summary.is_complete() {
            "complete".to_string()
        } else {
            format!("{}/{}", summary.completed_lessons, summary.total_lessons)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&summary.module.id),
            Cell::new(&summary.module.title),
            Cell::new(summary.total_lessons),
            Cell::new(status),
        ]);
    }

    println!("{table}");
    Ok(())
}
