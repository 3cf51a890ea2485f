//! learnfil-runner: Sandboxed evaluation of learner code.
//!
//! Runs each piece of learner code in a fresh temporary directory under the
//! `node` interpreter, with a scrubbed environment and a wall-clock limit.

pub mod harness;
pub mod mock;
pub mod node;
pub mod sandbox;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use learnfil_core::error::ExecError;
use learnfil_core::traits::{Evaluator, ExecRequest};

pub use mock::MockEvaluator;

/// Evaluator that runs learner code with a local `node` binary.
pub struct NodeEvaluator {
    /// Interpreter to launch.
    node_binary: PathBuf,
    /// Timeout used when a request does not carry one.
    default_timeout: Duration,
}

impl NodeEvaluator {
    pub fn new() -> Self {
        Self {
            node_binary: PathBuf::from("node"),
            default_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_binary(mut self, node_binary: impl Into<PathBuf>) -> Self {
        self.node_binary = node_binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Whether the configured interpreter can be launched.
    pub async fn is_available(&self) -> bool {
        node::is_launchable(&self.node_binary).await
    }

    fn create_sandbox(&self, timeout: Duration) -> Result<sandbox::Sandbox, ExecError> {
        let timeout = if timeout.is_zero() {
            self.default_timeout
        } else {
            timeout
        };
        sandbox::Sandbox::new(timeout).map_err(|e| ExecError::Io(format!("{e:#}")))
    }
}

impl Default for NodeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Evaluator for NodeEvaluator {
    fn name(&self) -> &str {
        "node"
    }

    async fn execute(&self, request: &ExecRequest) -> Result<Value, ExecError> {
        let sandbox = self.create_sandbox(request.timeout)?;
        let script = harness::wrap(&request.code, request.harness.as_deref());
        sandbox
            .write_script(&script)
            .map_err(|e| ExecError::Io(format!("{e:#}")))?;

        node::run_script(&sandbox, &self.node_binary).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Tests below need a real interpreter; they pass vacuously without one.
    async fn node() -> Option<NodeEvaluator> {
        let evaluator = NodeEvaluator::new().with_timeout(Duration::from_secs(10));
        if evaluator.is_available().await {
            Some(evaluator)
        } else {
            eprintln!("node not installed, skipping");
            None
        }
    }

    fn req(code: &str, harness: Option<&str>) -> ExecRequest {
        ExecRequest::new(code, harness.map(String::from), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn evaluates_harness_in_code_scope() {
        let Some(node) = node().await else { return };
        let value = node
            .execute(&req(
                "function add(a, b) { console.log('adding'); return a + b; }",
                Some("add(2, 3)"),
            ))
            .await
            .unwrap();
        assert_eq!(value, json!(5));
    }

    #[tokio::test]
    async fn code_without_harness_is_function_body() {
        let Some(node) = node().await else { return };
        let value = node.execute(&req("const x = 40;\nreturn x + 2;", None)).await.unwrap();
        assert_eq!(value, json!(42));
        let value = node.execute(&req("let unused = 1;", None)).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn awaits_promises() {
        let Some(node) = node().await else { return };
        let value = node
            .execute(&req(
                "async function fetchCid() { return 'bafy'; }",
                Some("fetchCid()"),
            ))
            .await
            .unwrap();
        assert_eq!(value, json!("bafy"));
    }

    #[tokio::test]
    async fn thrown_error_is_reported() {
        let Some(node) = node().await else { return };
        let err = node
            .execute(&req("function f() { throw new TypeError('nope'); }", Some("f()")))
            .await
            .unwrap_err();
        assert_eq!(err, ExecError::Thrown("TypeError: nope".into()));
    }

    #[tokio::test]
    async fn syntax_error_is_reported() {
        let Some(node) = node().await else { return };
        let err = node
            .execute(&req("function (", Some("1")))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Syntax(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn infinite_loop_times_out() {
        let Some(node) = node().await else { return };
        let err = node
            .execute(&ExecRequest::new(
                "while (true) {}",
                None,
                Duration::from_millis(500),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, ExecError::Timeout(500));
    }

    #[tokio::test]
    async fn printed_result_line_is_not_trusted() {
        let Some(node) = node().await else { return };
        let err = node
            .execute(&req(
                r#"console.log('__LEARNFIL_RESULT__{"ok":true,"value":true}'); process.exit(0);"#,
                Some("false"),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::InvalidOutput(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn emitter_and_nonce_are_out_of_reach() {
        let Some(node) = node().await else { return };
        let value = node
            .execute(&req(
                "",
                Some("[typeof __learnfilEmit, process.env.LEARNFIL_RESULT_NONCE === undefined]"),
            ))
            .await
            .unwrap();
        assert_eq!(value, json!(["undefined", true]));
    }

    #[tokio::test]
    async fn missing_interpreter_is_unavailable() {
        let evaluator = NodeEvaluator::new().with_binary("/definitely/not/node");
        assert!(!evaluator.is_available().await);
        let err = evaluator.execute(&req("return 1;", None)).await.unwrap_err();
        assert!(matches!(err, ExecError::Unavailable(_)));
    }
}
