use lash_session::{Category, Session};

use crate::error::RequireError;

/// Checks on environment variables.
///
/// Reads and writes go through the session's
/// [`Environment`](lash_session::Environment).
#[derive(Debug, Clone)]
pub struct RequireEnv {
    session: Session,
}

impl RequireEnv {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    /// Record `Env:Require` when `key` is unset or empty
    pub fn require(&self, key: &str, description: &str) -> &Self {
        if self.session.is_error() {
            return self;
        }
        let present = self
            .session
            .environment()
            .var(key)
            .is_some_and(|v| !v.is_empty());
        if !present {
            self.session.set_error(Category::Env.fail(
                "Require",
                RequireError::MissingVar {
                    key: key.to_string(),
                    description: description.to_string(),
                },
            ));
        }
        self
    }

    /// Set `key` to `value` unless it already has a non-empty value
    pub fn default(&self, key: &str, value: &str) -> &Self {
        if self.session.is_error() {
            return self;
        }
        let env = self.session.environment();
        if env.var(key).is_some_and(|v| !v.is_empty()) {
            return self;
        }
        match env.set_var(key, value) {
            Ok(()) => tracing::debug!(key, "Applied default for environment variable"),
            Err(e) => self.session.set_error(Category::Env.fail("Default", e)),
        }
        self
    }
}

/// Checks on positional arguments, captured when created.
#[derive(Debug, Clone)]
pub struct RequireArg {
    session: Session,
    args: Vec<String>,
}

impl RequireArg {
    pub fn new(session: &Session) -> Self {
        let args = session.environment().args();
        Self {
            session: session.clone(),
            args,
        }
    }

    /// Replace the captured arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Argument at `index`, position 0 is the program name
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Record `Arg:Require` when there is no argument at `index`
    pub fn require(&self, index: usize, description: &str) -> &Self {
        if self.session.is_error() {
            return self;
        }
        if index >= self.args.len() {
            self.session.set_error(Category::Arg.fail(
                "Require",
                RequireError::MissingArg {
                    index,
                    description: description.to_string(),
                },
            ));
        }
        self
    }
}
