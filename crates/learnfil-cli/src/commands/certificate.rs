//! The `learnfil certificate` command.

use std::path::PathBuf;

use anyhow::Result;

use learnfil_report::Certificate;

use crate::commands::open_session;

pub async fn execute(
    name: Option<String>,
    wallet: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, session) = open_session(config_path.as_deref(), false).await?;

    if !session.all_modules_completed().await {
        let overview = session.module_overview().await;
        let done: usize = overview.iter().map(|s| s.completed_lessons).sum();
        let total: usize = overview.iter().map(|s| s.total_lessons).sum();
        anyhow::bail!(
            "certificate unavailable: {done}/{total} lessons complete; finish every module first"
        );
    }

    let certificate = Certificate::for_identity(
        session.user(),
        name.as_deref(),
        wallet.as_deref(),
        &config.track_name,
    );
    tracing::info!(user = %session.user().id, "issuing certificate");

    println!("{}", certificate.render_text());
    if let Some(dir) = output {
        let path = certificate.write_html(&dir)?;
        println!("Certificate written to {}", path.display());
    }
    Ok(())
}
