//! HTTP back end hosting the client profile and the transaction ledger.

mod client;
mod ledger;
mod profile;

use std::time::Duration;

use secrecy::SecretString;

use crate::domain::ConfigError;

pub use client::BackendClient;
pub use ledger::HttpTransactionLedger;
pub use profile::HttpProfileStore;

/// Connection settings for the back end
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without trailing slash, e.g. `https://api.example.com/v1`
    pub base_url: String,
    /// Bearer token of the signed-in account, if the back end requires one
    pub api_token: Option<SecretString>,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("BACKEND_API_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("BACKEND_API_URL".to_string()))?;

        let timeout = match std::env::var("BACKEND_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidValue {
                    key: "BACKEND_TIMEOUT_SECS".to_string(),
                    message: e.to_string(),
                })?,
            Err(_) => Duration::from_secs(30),
        };

        let mut config = Self::new(base_url).with_timeout(timeout);
        if let Some(token) = std::env::var("BACKEND_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
        {
            config = config.with_token(token);
        }
        Ok(config)
    }
}
