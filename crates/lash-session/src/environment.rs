//! Process environment access
//!
//! Sessions read variables and arguments through [`Environment`] so tests and
//! sandboxed runs can swap in a [`MapEnv`] instead of the real process.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

pub trait Environment: Send + Sync {
    /// Value of a variable, `None` when unset or not valid UTF-8
    fn var(&self, key: &str) -> Option<String>;

    fn set_var(&self, key: &str, value: &str) -> io::Result<()>;

    /// Program arguments, position 0 is the program name
    fn args(&self) -> Vec<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        if !valid_key(key) {
            return None;
        }
        std::env::var(key).ok()
    }

    fn set_var(&self, key: &str, value: &str) -> io::Result<()> {
        if !valid_key(key) || value.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid environment variable '{}'", key),
            ));
        }
        std::env::set_var(key, value);
        Ok(())
    }

    fn args(&self) -> Vec<String> {
        std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

// std::env panics on these
fn valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}

/// In-memory environment, cloning shares the same variables
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: Arc<RwLock<HashMap<String, String>>>,
    args: Arc<RwLock<Vec<String>>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(self, key: &str, value: &str) -> Self {
        self.vars.write().insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.args.write() = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    fn set_var(&self, key: &str, value: &str) -> io::Result<()> {
        self.vars.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn args(&self) -> Vec<String> {
        self.args.read().clone()
    }
}
