//! Facade error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LashError {
    #[error("{var}: {message}")]
    InvalidSetting { var: &'static str, message: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
