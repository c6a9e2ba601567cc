//! Error reaction policies

use std::fmt;
use std::sync::Arc;

use crate::error::SessionError;

/// Caller supplied reaction
pub type ErrorHook = Arc<dyn Fn(&SessionError) + Send + Sync>;

/// What a session does the moment an error is recorded
#[derive(Clone, Default)]
pub enum OnError {
    /// Print the error on the error sink and exit with status 1
    #[default]
    Terminate,
    /// Print the error on the error sink and carry on
    Warn,
    /// Keep the error, say nothing
    Ignore,
    Custom(ErrorHook),
}

impl OnError {
    pub fn custom<F>(hook: F) -> Self
    where
        F: Fn(&SessionError) + Send + Sync + 'static,
    {
        OnError::Custom(Arc::new(hook))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnError::Terminate => "terminate",
            OnError::Warn => "warn",
            OnError::Ignore => "ignore",
            OnError::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnError::{}", self.as_str())
    }
}

impl std::str::FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminate" | "exit" => Ok(OnError::Terminate),
            "warn" => Ok(OnError::Warn),
            "ignore" => Ok(OnError::Ignore),
            _ => Err(format!("Unknown error policy: {}", s)),
        }
    }
}
