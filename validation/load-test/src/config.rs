//! Configuration loading and management.

use serde::{Deserialize, Serialize};
use session_common::REGISTER_PATH;
use std::path::Path;

use crate::ids::DEFAULT_ID_RANGE;

/// Environment variable holding the registration HTTP base url.
pub const ENV_HTTP_HOST: &str = "WS_HTTP_HOST";
/// Environment variable holding the websocket base url.
pub const ENV_WS_HOST: &str = "WS_HOST";
/// Environment variable overriding the HTTP request timeout.
pub const ENV_TIMEOUT_SECS: &str = "WS_REQUEST_TIMEOUT_SECS";
/// Environment variable seeding the id generator.
pub const ENV_ID_SEED: &str = "WS_ID_SEED";

/// Hook configuration, loaded from the environment or a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    /// Base url of the registration endpoint (WS_HTTP_HOST)
    pub http_host: String,
    /// Base url prepended to registered websocket paths (WS_HOST)
    pub ws_host: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub seed: Option<u64>, // Optional RNG seed for reproducible ids
    #[serde(default = "default_id_range")]
    pub id_range: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_id_range() -> u32 {
    DEFAULT_ID_RANGE
}

impl HookConfig {
    pub fn new(http_host: impl Into<String>, ws_host: impl Into<String>) -> Self {
        Self {
            http_host: http_host.into(),
            ws_host: ws_host.into(),
            request_timeout_secs: default_timeout_secs(),
            seed: None,
            id_range: default_id_range(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let http_host = lookup(ENV_HTTP_HOST)
            .ok_or_else(|| anyhow::anyhow!("{} is not set", ENV_HTTP_HOST))?;
        let ws_host =
            lookup(ENV_WS_HOST).ok_or_else(|| anyhow::anyhow!("{} is not set", ENV_WS_HOST))?;

        let mut config = Self::new(http_host, ws_host);

        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = v
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {}: {}", ENV_TIMEOUT_SECS, e))?;
        }
        if let Some(v) = lookup(ENV_ID_SEED) {
            config.seed = Some(
                v.parse()
                    .map_err(|e| anyhow::anyhow!("invalid {}: {}", ENV_ID_SEED, e))?,
            );
        }

        Ok(config)
    }

    /// Load configuration from YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HookConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.http_host.is_empty() {
            anyhow::bail!("http_host must not be empty");
        }
        if !self.http_host.starts_with("http://") && !self.http_host.starts_with("https://") {
            anyhow::bail!("http_host must be an http(s) url, got '{}'", self.http_host);
        }
        if self.ws_host.is_empty() {
            anyhow::bail!("ws_host must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be > 0");
        }
        if self.id_range == 0 {
            anyhow::bail!("id_range must be > 0");
        }
        Ok(())
    }

    /// Full url of the register endpoint.
    pub fn register_url(&self) -> String {
        self.endpoint(REGISTER_PATH)
    }

    /// Full url of an endpoint path on the registration host.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.http_host.trim_end_matches('/'), path)
    }

    /// Websocket target for a registered path: plain `ws_host + url`.
    pub fn target_for(&self, url: &str) -> String {
        format!("{}{}", self.ws_host, url)
    }
}
