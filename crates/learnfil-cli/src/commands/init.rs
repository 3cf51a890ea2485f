//! The `learnfil init` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use learnfil_core::curriculum::{parse_curriculum, validate_curriculum, Curriculum};
use learnfil_core::repository::CurriculumRepository;

use crate::commands::open_store;
use crate::config::load_config_from;

pub async fn execute(curriculum_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    // Starter config only when no explicit config was named.
    if config_path.is_none() {
        let local = Path::new("learnfil.toml");
        if local.exists() {
            println!("learnfil.toml already exists, skipping.");
        } else {
            std::fs::write(local, SAMPLE_CONFIG)?;
            println!("Created learnfil.toml");
        }
    }

    let config = load_config_from(config_path.as_deref())?;

    let curriculum = match &curriculum_path {
        Some(path) => parse_curriculum(path)?,
        None => Curriculum::builtin()?,
    };
    let warnings = validate_curriculum(&curriculum);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    let store = open_store(&config)?;
    let repository = CurriculumRepository::new(store);
    let seeded = repository.initialize_with(&curriculum).await?;

    match (seeded.seeded_modules, seeded.seeded_lessons) {
        (false, false) => println!(
            "Curriculum already present in {}, nothing seeded.",
            config.data_dir.display()
        ),
        (modules, lessons) => {
            if modules {
                println!("Seeded {} modules", curriculum.modules.len());
            }
            if lessons {
                println!("Seeded {} lessons", curriculum.lessons.len());
            }
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: learnfil modules");
    println!("  2. Run: learnfil show --lesson what-is-filecoin");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# LearnFIL configuration

data_dir = "./learnfil-data"

# Leave unset to learn as the anonymous demo user.
# user_id = "${USER}"
# display_name = "Your Name"
# wallet_address = "f1..."

node_binary = "node"
eval_timeout_secs = 5
result_delay_ms = 500
track_name = "LearnFIL Core Developer Track"
"#;
