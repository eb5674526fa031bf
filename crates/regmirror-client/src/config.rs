use std::path::Path;
use std::time::Duration;

use regmirror_store::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_CACHE_DURATION_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("regmirror/", env!("CARGO_PKG_VERSION"));

/// Client settings shared by every register a manager opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub page_size: usize,
    /// Seconds a cached client is served before it is refreshed again.
    pub cache_duration: u64,
    /// Sent verbatim as the `Authorization` header.
    pub api_key: Option<String>,
    pub user_agent: String,
    /// Overrides the URL derived from register name and environment.
    pub base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache_duration: DEFAULT_CACHE_DURATION_SECS,
            api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))?;
        if config.page_size == 0 {
            return Err(ClientError::Config("page_size must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration)
    }

    /// Base URL for `register` in `environment`, honouring `base_url`.
    pub fn register_url(&self, register: &str, environment: &str) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => register_url(register, environment),
        }
    }
}

/// Public URL of a register.
///
/// The `beta` environment is served from `register.gov.uk`; every other
/// environment from `<environment>.openregister.org`.
pub fn register_url(register: &str, environment: &str) -> String {
    if environment == "beta" {
        format!("https://{register}.register.gov.uk/")
    } else {
        format!("https://{register}.{environment}.openregister.org/")
    }
}
