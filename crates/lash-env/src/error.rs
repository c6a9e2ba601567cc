//! Requirement error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequireError {
    #[error("missing '{key}': {description}")]
    MissingVar { key: String, description: String },

    #[error("missing index '{index}': {description}")]
    MissingArg { index: usize, description: String },
}
