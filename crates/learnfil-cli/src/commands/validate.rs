//! The `learnfil validate` command.

use std::path::PathBuf;

use anyhow::Result;

use learnfil_core::curriculum::{parse_curriculum, validate_curriculum};

pub fn execute(curriculum_path: PathBuf) -> Result<()> {
    let curriculum = parse_curriculum(&curriculum_path)?;
    println!(
        "Curriculum: {} ({} modules, {} lessons)",
        curriculum_path.display(),
        curriculum.modules.len(),
        curriculum.lessons.len()
    );

    let warnings = validate_curriculum(&curriculum);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Curriculum valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
