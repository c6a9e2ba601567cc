//! HTTP error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("request has no url")]
    MissingUrl,

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    ReadBody(String),

    #[error("status {0} not allowed")]
    StatusNotAllowed(u16),
}

impl HttpError {
    /// Action tag used when this error is recorded on a session
    pub fn action(&self) -> &'static str {
        match self {
            HttpError::InvalidUrl { .. } => "Curl",
            HttpError::InvalidHeader(_) => "Header",
            HttpError::ReadBody(_) => "ReadBody",
            HttpError::MissingUrl | HttpError::Transport(_) | HttpError::StatusNotAllowed(_) => {
                "Send"
            }
        }
    }
}
