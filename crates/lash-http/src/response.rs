//! Response accessors

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use lash_session::{Category, Session};

use crate::transport::RawResponse;

pub struct HttpResponse {
    session: Session,
    /// Zero when nothing was received
    status: u16,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub(crate) fn empty(session: Session) -> Self {
        Self {
            session,
            status: 0,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub(crate) fn from_raw(session: Session, raw: RawResponse) -> Self {
        Self {
            session,
            status: raw.status,
            headers: raw.headers,
            body: Some(raw.body),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(self.body_bytes()).into_owned()
    }

    /// First value of a response header
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the owning session holds an error
    pub fn is_error(&self) -> bool {
        self.session.is_error()
    }

    /// Decode the body as JSON.
    ///
    /// `None` without an error when the body is missing or empty or the
    /// session is already broken, `HTTPResponse:FromJSON` when decoding fails.
    pub fn from_json<T: DeserializeOwned>(&self) -> Option<T> {
        if self.session.is_error() {
            return None;
        }
        let body = self.body.as_deref().filter(|b| !b.is_empty())?;
        self.session
            .check(Category::HttpResponse, "FromJSON", serde_json::from_slice(body))
    }
}
