//! CRM REST endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "civibridge/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrmConfig {
    /// Full URL of the CRM REST endpoint
    /// (e.g. `https://example.org/civicrm/ajax/rest`).
    #[serde(default)]
    pub endpoint: String,

    /// API key of the CRM user the bridge acts as.
    #[serde(default)]
    pub api_key: String,

    /// Site key shared by all REST callers of the CRM install.
    #[serde(default)]
    pub site_key: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            site_key: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl CrmConfig {
    /// Check if the endpoint and both keys are present.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty() && !self.site_key.is_empty()
    }

    /// Return `self` if configured, otherwise a [`ConfigError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Fails when any of `endpoint`, `api_key` or `site_key` is empty, or when
    /// the endpoint is not an http(s) URL.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "crm".into(),
            });
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "crm.endpoint".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.endpoint),
            });
        }
        Ok(self)
    }
}
