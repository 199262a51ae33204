//! Client configuration.
//!
//! `ClientConfig` is a plain value passed to `ArcaneClient::new`. Where it
//! comes from (flags, environment) is up to the caller; `validate` holds the
//! rules every source has to satisfy.

use std::fmt;

use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    /// Prefix for every request path, e.g. `https://arcane.example.com`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ARCANE_API_URL is required but not set")]
    MissingBaseUrl,
    #[error("ARCANE_PASSWORD is required when ARCANE_USERNAME is set")]
    MissingPassword,
    #[error("ARCANE_USERNAME is required when ARCANE_PASSWORD is set")]
    MissingUsername,
    #[error("Either ARCANE_API_KEY or both ARCANE_USERNAME and ARCANE_PASSWORD must be set")]
    MissingCredentials,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }

    /// Username and password, if both are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        non_empty(&self.username).zip(non_empty(&self.password))
    }

    /// Check that a base URL and one usable auth mode are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.api_key().is_some() || self.credentials().is_some() {
            return Ok(());
        }
        match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(_), None) => Err(ConfigError::MissingPassword),
            (None, Some(_)) => Err(ConfigError::MissingUsername),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
