/// Configuration schema for the verifier
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::ConfigError;

/// Base URL of the Gumroad v2 API
pub const DEFAULT_API_BASE_URL: &str = "https://api.gumroad.com/v2";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Gumroad API access token, sent on sale lookups
    pub access_token: String,

    /// Shared secret expected in the `secret` field of every ping.
    /// Unset or empty = no secret check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,

    /// Product permalinks that require a license key check
    /// instead of a sale lookup
    #[serde(default)]
    pub licensed_products: HashSet<String>,

    /// API root, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for the single outbound call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log filter for the command-line caller: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Config with the given token and every other field at its default
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            webhook_secret: None,
            licensed_products: HashSet::new(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_licensed_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.licensed_products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Secret to enforce, if any. An empty string means none
    pub fn effective_webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_licensed(&self, product_permalink: &str) -> bool {
        self.licensed_products.contains(product_permalink)
    }

    /// API root with any trailing slash removed
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.is_empty() {
            return Err(ConfigError::Invalid("access_token cannot be empty".to_string()));
        }

        let base = self.api_base();
        if base.is_empty() {
            return Err(ConfigError::Invalid("api_base_url cannot be empty".to_string()));
        }

        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "api_base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}
