//! Session configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use lash_session::{Environment, OnError, ProcessEnv, Session};

use crate::error::LashError;
use crate::Result;

pub const ON_ERROR_VAR: &str = "LASH_ON_ERROR";
pub const LOG_VAR: &str = "LASH_LOG";

/// Policy names a config can carry. Custom hooks are set in code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Terminate,
    Warn,
    Ignore,
}

impl From<PolicyKind> for OnError {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Terminate => OnError::Terminate,
            PolicyKind::Warn => OnError::Warn,
            PolicyKind::Ignore => OnError::Ignore,
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match OnError::from_str(s)? {
            OnError::Warn => Ok(PolicyKind::Warn),
            OnError::Ignore => Ok(PolicyKind::Ignore),
            _ => Ok(PolicyKind::Terminate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How sessions react to a recorded error
    pub on_error: PolicyKind,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_error: PolicyKind::Terminate,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `LASH_ON_ERROR` and `LASH_LOG`
    pub fn from_env() -> Result<Self> {
        Self::from_environment(&ProcessEnv)
    }

    pub fn from_environment(env: &dyn Environment) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = env.var(ON_ERROR_VAR).filter(|v| !v.is_empty()) {
            config.on_error = value.parse().map_err(|message| LashError::InvalidSetting {
                var: ON_ERROR_VAR,
                message,
            })?;
        }
        if let Some(value) = env.var(LOG_VAR).filter(|v| !v.is_empty()) {
            config.log_filter = value;
        }

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A new session using this config's policy
    pub fn session(&self) -> Session {
        let session = Session::new();
        session.on_error(self.on_error.into());
        tracing::debug!(on_error = ?self.on_error, "Created session");
        session
    }
}
