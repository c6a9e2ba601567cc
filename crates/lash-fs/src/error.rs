//! File error types

use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("path '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("path '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("appender for '{0}' is closed")]
    AppenderClosed(String),

    #[error("appender worker for '{0}' panicked")]
    WorkerPanicked(String),
}

impl FileError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        FileError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        FileError::Json {
            path: path.display().to_string(),
            source,
        }
    }
}
