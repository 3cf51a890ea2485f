//! Mock evaluator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use learnfil_core::error::ExecError;
use learnfil_core::traits::{Evaluator, ExecRequest};

/// An evaluator that never runs code.
///
/// Returns scripted results keyed by a substring of the harness expression
/// (or of the code, for harness-less requests).
pub struct MockEvaluator {
    /// Map of harness substring → result.
    responses: HashMap<String, Result<Value, ExecError>>,
    /// Result if no key matches.
    default_response: Result<Value, ExecError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<ExecRequest>>,
}

impl MockEvaluator {
    /// Create a mock with the given substring → result mappings. Unmatched
    /// requests throw a `ReferenceError`.
    pub fn new(responses: HashMap<String, Result<Value, ExecError>>) -> Self {
        Self {
            responses,
            default_response: Err(ExecError::Thrown(
                "ReferenceError: no scripted result".to_string(),
            )),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same value.
    pub fn with_fixed_value(value: Value) -> Self {
        Self {
            default_response: Ok(value),
            ..Self::new(HashMap::new())
        }
    }

    /// Get the number of calls made to this evaluator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this evaluator.
    pub fn last_request(&self) -> Option<ExecRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl Evaluator for MockEvaluator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, request: &ExecRequest) -> Result<Value, ExecError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|p| p.into_inner()) = Some(request.clone());

        let subject = request.harness.as_deref().unwrap_or(&request.code);
        // Longest key first so "add(2, 3)" beats "add".
        let mut keys: Vec<&String> = self.responses.keys().collect();
        keys.sort_by_key(|k| std::cmp::Reverse(k.len()));

        keys.into_iter()
            .find(|key| subject.contains(key.as_str()))
            .and_then(|key| self.responses.get(key))
            .unwrap_or(&self.default_response)
            .clone()
    }
}
