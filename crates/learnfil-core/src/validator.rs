//! Grades learner code against a lesson's validation tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::model::{Check, TestOutcome, ValidationTest};
use crate::traits::{Evaluator, ExecRequest};

/// Configuration for the validator.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Pause before results are returned. Pacing for interactive front ends;
    /// zero disables it.
    pub result_delay: Duration,
    /// Per-test execution limit.
    pub eval_timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            result_delay: Duration::from_millis(500),
            eval_timeout: Duration::from_secs(5),
        }
    }
}

/// Runs validation tests through an [`Evaluator`].
#[derive(Clone)]
pub struct CodeValidator {
    evaluator: Arc<dyn Evaluator>,
    config: ValidatorConfig,
}

impl CodeValidator {
    pub fn new(evaluator: Arc<dyn Evaluator>, config: ValidatorConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Grade `code` against every test, in order.
    ///
    /// Always returns exactly one outcome per test. Each `evaluate` check is
    /// a separate execution, so a throw in one test does not affect the
    /// others.
    pub async fn run(&self, code: &str, tests: &[ValidationTest]) -> Vec<TestOutcome> {
        let mut outcomes = Vec::with_capacity(tests.len());

        for test in tests {
            let actual = match &test.check {
                Check::Contains { needle } => Ok(Value::Bool(code.contains(needle.as_str()))),
                Check::Evaluate { harness } => {
                    let request = ExecRequest::new(
                        code,
                        Some(harness.clone()),
                        self.config.eval_timeout,
                    );
                    self.evaluator.execute(&request).await
                }
            };

            let outcome = match actual {
                Ok(actual) if values_equal(&test.expected, &actual) => TestOutcome {
                    description: test.description.clone(),
                    passed: true,
                    message: "Test passed".to_string(),
                },
                Ok(actual) => TestOutcome {
                    description: test.description.clone(),
                    passed: false,
                    message: format!("Expected {}, got {}", test.expected, actual),
                },
                Err(e) => {
                    tracing::debug!(
                        evaluator = self.evaluator.name(),
                        test = %test.description,
                        "evaluation failed: {e}"
                    );
                    TestOutcome {
                        description: test.description.clone(),
                        passed: false,
                        message: format!("Error: {e}"),
                    }
                }
            };
            outcomes.push(outcome);
        }

        if !self.config.result_delay.is_zero() {
            tokio::time::sleep(self.config.result_delay).await;
        }

        outcomes
    }
}

/// True iff every outcome passed. A lesson with no tests passes.
pub fn all_passed(outcomes: &[TestOutcome]) -> bool {
    outcomes.iter().all(|o| o.passed)
}

/// Deep equality where numbers compare by value, so `3` equals `3.0`.
pub fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => expected == actual,
    }
}
