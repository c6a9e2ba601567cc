//! HTTP transport
//!
//! Requests are executed through [`Transport`], the default is a blocking
//! `reqwest` client shared by the whole process.

use reqwest::header::HeaderMap;
use reqwest::Method;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

use crate::error::HttpError;
use crate::Result;

/// A fully built request
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Status, headers and the whole body
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub trait Transport: Send + Sync {
    fn send(&self, call: &HttpCall) -> Result<RawResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, call: &HttpCall) -> Result<RawResponse> {
        let mut request = self
            .client
            .request(call.method.clone(), call.url.clone())
            .headers(call.headers.clone());
        if let Some(body) = &call.body {
            request = request.body(body.clone());
        }

        let response = request
            .send()
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| HttpError::ReadBody(e.to_string()))?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Process-wide default transport, built on first use
pub fn default_transport() -> Arc<dyn Transport> {
    static DEFAULT: LazyLock<Arc<dyn Transport>> =
        LazyLock::new(|| Arc::new(ReqwestTransport::new()));
    Arc::clone(&DEFAULT)
}
