//! Script execution with the `node` interpreter.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use serde_json::Value;
use tokio::process::Command;

use learnfil_core::error::ExecError;

use crate::harness::decode_output;
use crate::sandbox::Sandbox;

/// Run the sandbox's wrapper script and decode the value it reports.
pub async fn run_script(sandbox: &Sandbox, node_binary: &Path) -> Result<Value, ExecError> {
    let start = Instant::now();

    let mut cmd = Command::new(node_binary);
    cmd.arg(sandbox.script_path())
        .current_dir(sandbox.work_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    for (key, val) in sandbox.build_env() {
        cmd.env(&key, &val);
    }

    let timeout_ms = sandbox.timeout().as_millis() as u64;
    let output = match tokio::time::timeout(sandbox.timeout(), cmd.output()).await {
        Err(_) => return Err(ExecError::Timeout(timeout_ms)),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExecError::Unavailable(format!(
                "'{}' not found",
                node_binary.display()
            )))
        }
        Ok(Err(e)) => return Err(ExecError::Io(format!("failed to run node: {e}"))),
        Ok(Ok(output)) => output,
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    tracing::debug!(
        status = %output.status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "node finished"
    );

    decode_output(&stdout, &stderr, sandbox.nonce())
}

/// Whether `node_binary` can be launched.
pub async fn is_launchable(node_binary: &Path) -> bool {
    Command::new(node_binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let sandbox = Sandbox::new(Duration::from_secs(5)).unwrap();
        sandbox.write_script("").unwrap();
        let err = run_script(&sandbox, Path::new("/definitely/not/node"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Unavailable(_)));
        assert!(!is_launchable(Path::new("/definitely/not/node")).await);
    }
}
