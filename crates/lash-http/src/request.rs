//! Fluent request builder

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::fmt::Display;
use std::sync::Arc;
use url::Url;

use lash_session::{Category, Session};

use crate::error::HttpError;
use crate::response::HttpResponse;
use crate::transport::{default_transport, HttpCall, Transport};

/// Statuses accepted when no allow-list is given
pub const DEFAULT_ALLOWED_STATUSES: [u16; 4] = [200, 201, 202, 204];

/// Which response statuses count as success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedStatus {
    Any,
    Only(Vec<u16>),
}

impl AllowedStatus {
    pub fn allows(&self, status: u16) -> bool {
        match self {
            AllowedStatus::Any => true,
            AllowedStatus::Only(list) => list.contains(&status),
        }
    }
}

impl Default for AllowedStatus {
    fn default() -> Self {
        AllowedStatus::Only(DEFAULT_ALLOWED_STATUSES.to_vec())
    }
}

pub struct HttpRequest {
    session: Session,
    method: Method,
    url: Option<Url>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    allowed: AllowedStatus,
    /// Falls back to the process-wide default when unset
    transport: Option<Arc<dyn Transport>>,
}

impl HttpRequest {
    /// GET request for the interpolated `url`
    pub fn new(session: &Session, url: &str, args: &[&dyn Display]) -> Self {
        let mut request = Self {
            session: session.clone(),
            method: Method::GET,
            url: None,
            headers: HeaderMap::new(),
            body: None,
            allowed: AllowedStatus::default(),
            transport: None,
        };
        if session.is_error() {
            return request;
        }

        let url = session.env_str(url, args);
        match Url::parse(&url) {
            Ok(parsed) => request.url = Some(parsed),
            Err(source) => request.fail(HttpError::InvalidUrl { url, source }),
        }
        request
    }

    fn fail(&self, err: HttpError) {
        self.session
            .set_error(Category::HttpRequest.fail(err.action(), err));
    }

    pub fn post(self, body: impl Into<Vec<u8>>) -> Self {
        self.method(Method::POST, Some(body.into()))
    }

    pub fn put(self, body: impl Into<Vec<u8>>) -> Self {
        self.method(Method::PUT, Some(body.into()))
    }

    pub fn delete(self) -> Self {
        self.method(Method::DELETE, None)
    }

    /// Any method, a `None` body keeps the current one
    pub fn method(mut self, method: Method, body: Option<Vec<u8>>) -> Self {
        self.method = method;
        if body.is_some() {
            self.body = body;
        }
        self
    }

    /// Set a header, replacing any previous values
    pub fn header(mut self, name: &str, value: &str, args: &[&dyn Display]) -> Self {
        if let Some((name, value)) = self.header_pair(name, value, args) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add another value for a header
    pub fn add_header(mut self, name: &str, value: &str, args: &[&dyn Display]) -> Self {
        if let Some((name, value)) = self.header_pair(name, value, args) {
            self.headers.append(name, value);
        }
        self
    }

    fn header_pair(
        &self,
        name: &str,
        value: &str,
        args: &[&dyn Display],
    ) -> Option<(HeaderName, HeaderValue)> {
        if self.session.is_error() {
            return None;
        }
        let value = self.session.env_str(value, args);
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => Some((name, value)),
            _ => {
                self.fail(HttpError::InvalidHeader(name.to_string()));
                None
            }
        }
    }

    /// Replace the accepted statuses (default 200, 201, 202, 204)
    pub fn allow_responses(mut self, statuses: &[u16]) -> Self {
        self.allowed = AllowedStatus::Only(statuses.to_vec());
        self
    }

    pub fn allow_any_status(mut self) -> Self {
        self.allowed = AllowedStatus::Any;
        self
    }

    /// Apply a bundle of common settings
    pub fn common<F>(self, custom: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        custom(self)
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn allowed(&self) -> &AllowedStatus {
        &self.allowed
    }

    /// Send the request.
    ///
    /// Does nothing if the session already holds an error. A status outside
    /// the allow-list is recorded as `HTTPRequest:Send` but the status and body
    /// are still available on the response.
    pub fn response(self) -> HttpResponse {
        let mut response = HttpResponse::empty(self.session.clone());
        if self.session.is_error() {
            return response;
        }
        let Some(url) = self.url.clone() else {
            self.fail(HttpError::MissingUrl);
            return response;
        };

        let call = HttpCall {
            method: self.method.clone(),
            url,
            headers: self.headers.clone(),
            body: self.body.clone(),
        };
        tracing::debug!(method = %call.method, url = %call.url, "Sending request");

        let transport = self.transport.clone().unwrap_or_else(default_transport);
        match transport.send(&call) {
            Ok(raw) => {
                let status = raw.status;
                response = HttpResponse::from_raw(self.session.clone(), raw);
                tracing::debug!(status, "Received response");
                if !self.allowed.allows(status) {
                    self.fail(HttpError::StatusNotAllowed(status));
                }
            }
            Err(err) => self.fail(err),
        }
        response
    }
}
