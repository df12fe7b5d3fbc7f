//! adaptest configuration and gateway factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptest_core::driver::RetryPolicy;
use adaptest_core::mastery::MasterySkillTracker;
use adaptest_core::model::StudentProfile;
use adaptest_core::session::{SessionConfig, DEFAULT_SESSION_LENGTH};

use crate::http::{HttpQuestionGateway, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable that overrides `gateway.base_url`.
pub const GATEWAY_URL_ENV: &str = "ADAPTEST_GATEWAY_URL";

/// Where to reach the question service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Questions per session.
    #[serde(default = "default_length")]
    pub length: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            length: default_length(),
        }
    }
}

fn default_length() -> u32 {
    DEFAULT_SESSION_LENGTH
}

/// Retry settings for question requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_retries() -> u32 {
    3
}
fn default_initial_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    8000
}

/// Top-level adaptest configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptestConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Profile the process starts with.
    #[serde(default)]
    pub student: StudentProfile,
}

impl AdaptestConfig {
    pub fn session_config(&self) -> Result<SessionConfig> {
        SessionConfig::new(self.session.length).context("invalid [session] length")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            max_delay: Duration::from_millis(
                self.retry.max_delay_ms.max(self.retry.initial_delay_ms),
            ),
        }
    }

    pub fn tracker(&self) -> Result<MasterySkillTracker> {
        MasterySkillTracker::new(self.student.clone()).context("invalid [student] profile")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// `ADAPTEST_GATEWAY_URL` overrides the gateway base URL.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<AdaptestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdaptestConfig::default(),
    };

    if let Ok(url) = std::env::var(GATEWAY_URL_ENV) {
        config.gateway.base_url = url;
    }
    config.gateway.base_url = resolve_env_vars(&config.gateway.base_url);

    anyhow::ensure!(config.session.length >= 1, "session length must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}

/// Create the HTTP gateway described by `config`.
pub fn create_gateway(config: &GatewayConfig) -> Result<HttpQuestionGateway> {
    HttpQuestionGateway::new(&config.base_url, config.timeout_secs)
        .with_context(|| format!("failed to create gateway for {}", config.base_url))
}
