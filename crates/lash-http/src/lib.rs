//! Lash HTTP
//!
//! Fluent, blocking HTTP requests:
//! - URLs and header values are `$token` interpolated
//! - Failures are recorded on the session as `HTTPRequest:<Action>`
//! - Only statuses on the allow-list count as success

mod error;
mod request;
mod response;
mod transport;

pub use error::HttpError;
pub use request::{AllowedStatus, HttpRequest, DEFAULT_ALLOWED_STATUSES};
pub use response::HttpResponse;
pub use transport::{default_transport, HttpCall, RawResponse, ReqwestTransport, Transport};

pub use reqwest::header::HeaderMap;
pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, HttpError>;
