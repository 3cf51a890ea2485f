//! Core trait definitions for code evaluators and identity providers.
//!
//! Evaluators are implemented by the `learnfil-runner` crate; identity is
//! supplied by whatever front end hosts the session.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ExecError;

// ---------------------------------------------------------------------------
// Evaluator trait
// ---------------------------------------------------------------------------

/// Executes learner-submitted code and returns the value it produces.
///
/// This is the trust boundary for learner code: implementations decide how
/// (and whether) the code is isolated from the host.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Human-readable evaluator name (e.g. "node").
    fn name(&self) -> &str;

    /// Run the code and return the resulting value as JSON.
    async fn execute(&self, request: &ExecRequest) -> Result<serde_json::Value, ExecError>;
}

/// Request to execute learner code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecRequest {
    /// The learner's code.
    pub code: String,
    /// Expression evaluated after `code` in the same scope. When absent the
    /// code is treated as a function body and its return value is used.
    #[serde(default)]
    pub harness: Option<String>,
    /// Wall-clock limit for the execution.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
}

impl ExecRequest {
    pub fn new(code: impl Into<String>, harness: Option<String>, timeout: Duration) -> Self {
        Self {
            code: code.into(),
            harness: harness.filter(|h| !h.trim().is_empty()),
            timeout,
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// User id used when no account is signed in.
pub const DEMO_USER_ID: &str = "demo-user";

/// The learner a session acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable identifier used to key progress records.
    pub id: String,
    /// Name printed on certificates.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Wallet address printed on certificates.
    #[serde(default)]
    pub wallet_address: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            wallet_address: None,
        }
    }

    /// The placeholder identity for anonymous use.
    pub fn anonymous() -> Self {
        Self::new(DEMO_USER_ID)
    }
}

/// Supplies the current user, if one is signed in.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;

    /// The current user, falling back to the anonymous placeholder.
    fn resolve(&self) -> UserIdentity {
        self.current_user().unwrap_or_else(UserIdentity::anonymous)
    }
}

/// An identity fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<UserIdentity>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}
