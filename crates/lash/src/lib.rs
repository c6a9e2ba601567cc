//! Lash
//!
//! Script-style Rust: one session carries the first error of a chain, and
//! every collaborator after it quietly does nothing.
//!
//! ```no_run
//! use lash::{Session, SessionExt};
//!
//! let session = Session::new();
//! session.env().require("API", "base url of the jobs api");
//! let body = session.curl("$API/jobs/$0", &[&7]).response().body_string();
//! session.open_file("jobs.log", &[]).append_line("$0", &[&body]);
//! ```

mod config;
mod error;
mod ext;

pub use config::{Config, PolicyKind, LOG_VAR, ON_ERROR_VAR};
pub use error::LashError;
pub use ext::SessionExt;

pub use lash_env::{RequireArg, RequireEnv, RequireError};
pub use lash_fs::{Appender, File, FileError, Lines};
pub use lash_http::{
    AllowedStatus, HeaderMap, HttpCall, HttpError, HttpRequest, HttpResponse, Method, RawResponse,
    ReqwestTransport, Transport, DEFAULT_ALLOWED_STATUSES,
};
pub use lash_session::{
    env_str, env_str_with, Category, Environment, ErrorHook, InterpolateError, MapEnv,
    MemorySink, OnError, ProcessEnv, Session, SessionError,
};

use std::sync::LazyLock;

pub type Result<T> = std::result::Result<T, LashError>;

static SHARED: LazyLock<Session> = LazyLock::new(|| {
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring invalid lash settings");
        Config::default()
    });
    config.session()
});

/// Process-wide session built from the environment on first use.
///
/// Meant for a binary's entry point. Libraries should take a `&Session`.
pub fn shared_session() -> Session {
    SHARED.clone()
}

/// Initialize logging from `RUST_LOG`, falling back to `LASH_LOG` or `info`
pub fn init_logging() {
    init_logging_with(&Config::from_env().unwrap_or_default());
}

pub fn init_logging_with(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    // A subscriber may already be installed by the host program
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_session_is_shared() {
        let a = shared_session();
        let b = shared_session();

        a.with_env(MapEnv::new().with_var("shared_probe", "seen"));

        assert_eq!(b.env_str("$shared_probe", &[]), "seen");
    }

    #[test]
    fn test_init_logging_twice() {
        let config = Config {
            log_filter: "lash=debug".to_string(),
            ..Config::default()
        };
        init_logging_with(&config);
        init_logging_with(&config);
    }
}
