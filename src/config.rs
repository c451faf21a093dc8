//! Client configuration and session credentials.
//!
//! Endpoints and credentials are plain values handed to the request layer.
//! Nothing here reads process state implicitly except [`ClientConfig::with_env`].

use crate::error::{BoardlyError, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tokio::fs;

pub const ENV_GRAPHQL_URL: &str = "BOARDLY_GRAPHQL_URL";
pub const ENV_AUTH_URL: &str = "BOARDLY_AUTH_URL";
pub const ENV_TIMEOUT_SECS: &str = "BOARDLY_TIMEOUT_SECS";

/// Where and how to reach the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// GraphQL endpoint receiving queries and mutations
    pub graphql_url: String,
    /// Sign-in service base URL. Only carried so callers can share one config file.
    pub auth_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:8080/v1/graphql".to_string(),
            auth_url: None,
            timeout_secs: 30,
            user_agent: format!("boardly-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new(graphql_url: impl Into<String>) -> Self {
        Self {
            graphql_url: graphql_url.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| BoardlyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).await.map_err(|e| {
            BoardlyError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Overrides fields from values returned by `lookup` for the `BOARDLY_*` keys
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_GRAPHQL_URL) {
            self.graphql_url = url;
        }
        if let Some(url) = lookup(ENV_AUTH_URL) {
            self.auth_url = Some(url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                BoardlyError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Overrides fields from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.graphql_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BoardlyError::Config(format!(
                "graphql_url must be an http(s) URL, got '{}'",
                self.graphql_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(BoardlyError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Credentials issued by the sign-in service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
