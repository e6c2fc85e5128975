use serde::{Deserialize, Serialize};
use tether_types::{ApiError, ApiResult};

pub const ENV_BASE_URL: &str = "TETHER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TETHER_TIMEOUT_SECS";
pub const ENV_ACCESS_TOKEN: &str = "TETHER_ACCESS_TOKEN";

/// Configuration for [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `https://api.example.com`. Resource paths are appended.
    pub base_url: String,
    /// Per-request timeout (in seconds).
    pub timeout_secs: u64,
    /// Sent as a bearer token when present.
    #[serde(default)]
    pub access_token: Option<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            access_token: None,
            user_agent: concat!("tether/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `TETHER_BASE_URL`, `TETHER_TIMEOUT_SECS` and
    /// `TETHER_ACCESS_TOKEN`.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs.trim().parse().map_err(|e| {
                ApiError::validation(format!("{ENV_TIMEOUT_SECS}={secs:?} is not a number: {e}"))
            })?;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty()) {
            config.access_token = Some(token);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
