//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use learnfil_core::traits::{StaticIdentity, UserIdentity};
use learnfil_core::validator::ValidatorConfig;

/// Top-level LearnFIL configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnfilConfig {
    /// Directory holding the key-value store files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Signed-in user. Unset means the anonymous demo user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Name printed on certificates.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Wallet printed on certificates.
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Interpreter used to run learner code.
    #[serde(default = "default_node_binary")]
    pub node_binary: PathBuf,
    /// Per-test execution limit in seconds.
    #[serde(default = "default_eval_timeout")]
    pub eval_timeout_secs: u64,
    /// Pause before test results are shown, in milliseconds.
    #[serde(default = "default_result_delay")]
    pub result_delay_ms: u64,
    /// Track name printed on certificates.
    #[serde(default = "default_track_name")]
    pub track_name: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./learnfil-data")
}
fn default_node_binary() -> PathBuf {
    PathBuf::from("node")
}
fn default_eval_timeout() -> u64 {
    5
}
fn default_result_delay() -> u64 {
    500
}
fn default_track_name() -> String {
    learnfil_report::certificate::DEFAULT_TRACK.to_string()
}

impl Default for LearnfilConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            user_id: None,
            display_name: None,
            wallet_address: None,
            node_binary: default_node_binary(),
            eval_timeout_secs: default_eval_timeout(),
            result_delay_ms: default_result_delay(),
            track_name: default_track_name(),
        }
    }
}

impl LearnfilConfig {
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            result_delay: Duration::from_millis(self.result_delay_ms),
            eval_timeout: Duration::from_secs(self.eval_timeout_secs),
        }
    }

    pub fn identity(&self) -> StaticIdentity {
        StaticIdentity(self.user_id.as_ref().map(|id| UserIdentity {
            id: id.clone(),
            display_name: self.display_name.clone(),
            wallet_address: self.wallet_address.clone(),
        }))
    }

    fn resolve_env(&mut self) {
        let resolve_opt = |v: &Option<String>| {
            v.as_deref()
                .map(resolve_env_vars)
                .filter(|s| !s.trim().is_empty())
        };
        self.data_dir = PathBuf::from(resolve_env_vars(&self.data_dir.to_string_lossy()));
        self.node_binary = PathBuf::from(resolve_env_vars(&self.node_binary.to_string_lossy()));
        self.user_id = resolve_opt(&self.user_id);
        self.display_name = resolve_opt(&self.display_name);
        self.wallet_address = resolve_opt(&self.wallet_address);
        self.track_name = resolve_env_vars(&self.track_name);
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
            from = start + value.len();
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `learnfil.toml` in the current directory
/// 2. `~/.config/learnfil/config.toml`
///
/// Environment variable overrides: `LEARNFIL_DATA_DIR`, `LEARNFIL_USER`.
pub fn load_config_from(path: Option<&Path>) -> Result<LearnfilConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("learnfil.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LearnfilConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LearnfilConfig::default(),
    };

    if let Ok(dir) = std::env::var("LEARNFIL_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(user) = std::env::var("LEARNFIL_USER") {
        config.user_id = Some(user);
    }

    config.resolve_env();
    tracing::debug!(
        path = ?config_path,
        data_dir = %config.data_dir.display(),
        "loaded config"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("learnfil"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LEARNFIL_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_LEARNFIL_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_LEARNFIL_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_LEARNFIL_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_expanded_again() {
        std::env::set_var("_LEARNFIL_SELF_REF", "${_LEARNFIL_SELF_REF}");
        std::env::set_var("_LEARNFIL_NAME", "ada");
        assert_eq!(
            resolve_env_vars("${_LEARNFIL_SELF_REF}/${_LEARNFIL_NAME}"),
            "${_LEARNFIL_SELF_REF}/ada"
        );
        std::env::remove_var("_LEARNFIL_SELF_REF");
        std::env::remove_var("_LEARNFIL_NAME");
    }

    #[test]
    fn default_config() {
        let config = LearnfilConfig::default();
        assert_eq!(config.eval_timeout_secs, 5);
        assert_eq!(config.result_delay_ms, 500);
        assert_eq!(config.track_name, "LearnFIL Core Developer Track");
        assert!(config.identity().0.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: LearnfilConfig = toml::from_str(
            r#"
data_dir = "/tmp/learnfil"
user_id = "ada"
display_name = "Ada Lovelace"
result_delay_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/learnfil"));
        assert_eq!(config.validator_config().result_delay, Duration::ZERO);
        assert_eq!(config.validator_config().eval_timeout, Duration::from_secs(5));

        let user = config.identity().0.unwrap();
        assert_eq!(user.id, "ada");
        assert_eq!(user.display_name.as_deref(), Some("Ada Lovelace"));
        assert!(user.wallet_address.is_none());
    }

    #[test]
    fn blank_user_after_resolution_is_anonymous() {
        let mut config = LearnfilConfig {
            user_id: Some("${_LEARNFIL_UNSET_VAR}".into()),
            ..LearnfilConfig::default()
        };
        config.resolve_env();
        assert!(config.user_id.is_none());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/learnfil.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
