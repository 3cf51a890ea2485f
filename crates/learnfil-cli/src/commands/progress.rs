//! The `learnfil progress` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use learnfil_core::model::{ModuleSummary, ProgressRecord};

use crate::commands::open_session;

#[derive(Serialize)]
struct ProgressView<'a> {
    user_id: &'a str,
    modules: &'a [ModuleSummary],
    completed: Vec<&'a ProgressRecord>,
    track_complete: bool,
}

pub async fn execute(format: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, session) = open_session(config_path.as_deref(), false).await?;
    let overview = session.module_overview().await;
    let track_complete = session.all_modules_completed().await;

    match format.as_str() {
        "json" => {
            let completed = session
                .progress()
                .completed_lesson_ids()
                .iter()
                .filter_map(|id| session.progress().record(id))
                .collect();
            let view = ProgressView {
                user_id: &session.user().id,
                modules: &overview,
                completed,
                track_complete,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "text" => {
            println!("Progress for {}", session.user().id);

            let mut table = Table::new();
            table.set_header(vec!["Module", "Completed", "Progress"]);
            let (mut done, mut total) = (0, 0);
            for summary in &overview {
                done += summary.completed_lessons;
                total += summary.total_lessons;
                table.add_row(vec![
                    Cell::new(&summary.module.title),
                    Cell::new(format!(
                        "{}/{}",
                        summary.completed_lessons, summary.total_lessons
                    )),
                    Cell::new(format!("{:.0}%", percent(summary.completed_lessons, summary.total_lessons))),
                ]);
            }
            table.add_row(vec![
                Cell::new("Total"),
                Cell::new(format!("{done}/{total}")),
                Cell::new(format!("{:.0}%", percent(done, total))),
            ]);
            println!("{table}");

            if track_complete {
                println!("Track complete! Run `learnfil certificate` to claim your certificate.");
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected text or json)"),
    }

    Ok(())
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 * 100.0 / total as f64
    }
}
