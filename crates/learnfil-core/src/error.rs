//! Storage and evaluation error types.
//!
//! Read failures never surface as errors: the store adapter recovers them
//! locally. Write failures and evaluation failures are typed here so callers
//! can classify them without string matching.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::store::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be read.
    #[error("failed to read '{key}': {message}")]
    Read { key: String, message: String },

    /// The backing store rejected a write.
    #[error("failed to write '{key}': {message}")]
    Write { key: String, message: String },

    /// The write would exceed the store's byte quota.
    #[error("storage quota exceeded writing '{key}' ({needed} bytes needed, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// A value could not be encoded as JSON.
    #[error("failed to encode '{key}': {message}")]
    Encode { key: String, message: String },
}

impl StorageError {
    /// The key the failed operation targeted.
    pub fn key(&self) -> &str {
        match self {
            StorageError::Read { key, .. }
            | StorageError::Write { key, .. }
            | StorageError::QuotaExceeded { key, .. }
            | StorageError::Encode { key, .. } => key,
        }
    }
}

/// Errors produced while executing learner code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The learner code threw (or rejected) at runtime.
    #[error("{0}")]
    Thrown(String),

    /// The learner code could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Execution did not finish in time.
    #[error("execution timed out after {0}ms")]
    Timeout(u64),

    /// No interpreter is available to run the code.
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),

    /// The sandbox could not be prepared.
    #[error("sandbox error: {0}")]
    Io(String),

    /// The interpreter produced output that could not be decoded.
    #[error("invalid evaluator output: {0}")]
    InvalidOutput(String),
}

impl ExecError {
    /// Returns `true` if the failure is attributable to the learner's code
    /// rather than to the host environment.
    pub fn is_learner_fault(&self) -> bool {
        matches!(
            self,
            ExecError::Thrown(_) | ExecError::Syntax(_) | ExecError::Timeout(_)
        )
    }
}
