//! Collaborator entry points on [`Session`]

use std::fmt::Display;

use lash_env::{RequireArg, RequireEnv};
use lash_fs::File;
use lash_http::HttpRequest;
use lash_session::Session;

/// Starts each collaborator chain from a session
pub trait SessionExt {
    /// GET request to the interpolated `url`
    fn curl(&self, url: &str, args: &[&dyn Display]) -> HttpRequest;

    /// File at the interpolated `name`
    fn open_file(&self, name: &str, args: &[&dyn Display]) -> File;

    fn env(&self) -> RequireEnv;

    /// Positional arguments as seen by the session's environment
    fn args(&self) -> RequireArg;
}

impl SessionExt for Session {
    fn curl(&self, url: &str, args: &[&dyn Display]) -> HttpRequest {
        HttpRequest::new(self, url, args)
    }

    fn open_file(&self, name: &str, args: &[&dyn Display]) -> File {
        File::open(self, name, args)
    }

    fn env(&self) -> RequireEnv {
        RequireEnv::new(self)
    }

    fn args(&self) -> RequireArg {
        RequireArg::new(self)
    }
}
