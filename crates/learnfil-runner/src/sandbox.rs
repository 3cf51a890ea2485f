//! Scratch directory for running learner code.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::TempDir;
use uuid::Uuid;

use crate::harness::NONCE_ENV;

/// File name of the wrapper script inside the sandbox.
const SCRIPT_NAME: &str = "main.cjs";

/// A temporary working directory holding one wrapper script.
///
/// On drop, the temporary directory is automatically cleaned up.
pub struct Sandbox {
    /// Temporary directory the interpreter runs in.
    work_dir: TempDir,
    /// Wall-clock limit for the run.
    timeout: Duration,
    /// Tags this run's result line.
    nonce: String,
}

impl Sandbox {
    /// Create a new, empty sandbox.
    pub fn new(timeout: Duration) -> Result<Self> {
        let work_dir = TempDir::with_prefix("learnfil-")
            .context("failed to create temp directory")?;
        Ok(Self {
            work_dir,
            timeout,
            nonce: Uuid::new_v4().simple().to_string(),
        })
    }

    /// Get the path to the sandbox working directory.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Get the sandbox timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The nonce the wrapper script tags its result with.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Path of the wrapper script.
    pub fn script_path(&self) -> PathBuf {
        self.work_dir.path().join(SCRIPT_NAME)
    }

    /// Write the wrapper script into the sandbox.
    pub fn write_script(&self, script: &str) -> Result<PathBuf> {
        let path = self.script_path();
        std::fs::write(&path, script)
            .with_context(|| format!("failed to write {SCRIPT_NAME}"))?;
        Ok(path)
    }

    /// Build environment variables for child processes.
    ///
    /// Points `HOME` at the sandbox and blanks credentials so learner code
    /// cannot read them.
    pub fn build_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            (
                "HOME".to_string(),
                self.work_dir.path().to_string_lossy().to_string(),
            ),
            ("NODE_OPTIONS".to_string(), String::new()),
            ("NODE_PATH".to_string(), String::new()),
            (NONCE_ENV.to_string(), self.nonce.clone()),
        ];

        for var in &[
            "SSH_AUTH_SOCK",
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "AWS_SESSION_TOKEN",
            "GITHUB_TOKEN",
            "GH_TOKEN",
            "NPM_TOKEN",
            "LOTUS_API_TOKEN",
            "FULLNODE_API_INFO",
            "WEB3_STORAGE_TOKEN",
            "PRIVATE_KEY",
            "DATABASE_URL",
        ] {
            env.push((var.to_string(), String::new()));
        }

        env
    }
}
