//! Session error types
//!
//! Every failure routed through a [`Session`](crate::Session) is a
//! [`SessionError`]: a category tag, an action tag and the underlying cause.
//! It always renders as `Category:Action:cause`.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Underlying cause of a [`SessionError`]
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Subsystem that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Required environment variables
    Env,
    /// Required positional arguments
    Arg,
    /// `$token` interpolation
    EnvStr,
    File,
    HttpRequest,
    HttpResponse,
    Session,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Env => "Env",
            Category::Arg => "Arg",
            Category::EnvStr => "EnvStr",
            Category::File => "File",
            Category::HttpRequest => "HTTPRequest",
            Category::HttpResponse => "HTTPResponse",
            Category::Session => "Session",
        }
    }

    /// Tag an action and its cause onto this category
    pub fn fail<E>(self, action: &'static str, cause: E) -> SessionError
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        SessionError::new(self, action, cause)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure recorded on a session.
///
/// The cause is mandatory, so an "empty" record cannot exist. Absence of an
/// error is always `None`.
#[derive(Error, Debug, Clone)]
#[error("{category}:{action}:{cause}")]
pub struct SessionError {
    category: Category,
    action: &'static str,
    #[source]
    cause: Cause,
}

impl SessionError {
    pub fn new<E>(category: Category, action: &'static str, cause: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            category,
            action,
            cause: Arc::from(cause.into()),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    /// Check the `Category:Action` pair
    pub fn is(&self, category: Category, action: &str) -> bool {
        self.category == category && self.action == action
    }
}

/// Interpolation failures reported by [`Session::env_str`](crate::Session::env_str)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    #[error("'${index}' is out of range in '{template}'")]
    ArgIndex { index: usize, template: String },

    #[error("'${name}' not found in '{template}'")]
    EnvName { name: String, template: String },
}

impl InterpolateError {
    pub fn action(&self) -> &'static str {
        match self {
            InterpolateError::ArgIndex { .. } => "ArgIndex",
            InterpolateError::EnvName { .. } => "EnvName",
        }
    }
}
