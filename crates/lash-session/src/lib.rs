//! Lash Session Core
//!
//! - A Session holds at most one outstanding error and a reaction policy
//! - Collaborators check the Session before acting and route failures into it
//! - Errors render as `Category:Action:cause`
//! - `$name` / `$0` interpolation reports into the same error slot

mod environment;
mod error;
mod interpolate;
mod output;
mod policy;
mod session;

pub use environment::{Environment, MapEnv, ProcessEnv};
pub use error::{Category, Cause, InterpolateError, SessionError};
pub use interpolate::{env_str, env_str_with, tokens, Token};
pub use output::MemorySink;
pub use policy::{ErrorHook, OnError};
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
