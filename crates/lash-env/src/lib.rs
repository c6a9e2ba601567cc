//! Lash Env
//!
//! Up-front checks for the variables and positional arguments a script needs.
//! A missing one is recorded as `Env:Require` or `Arg:Require`.

mod error;
mod require;

pub use error::RequireError;
pub use require::{RequireArg, RequireEnv};

pub type Result<T> = std::result::Result<T, RequireError>;
