//! HTTP client abstraction, so the service code can be exercised without network access.

use std::time::Duration;

use bytes::Bytes;
use log::debug;
use reqwest::Url;

use crate::error::HarvestError;

/// Response of a GET request. Non-success statuses are returned as responses, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking HTTP client.
pub trait HttpClient: Send + Sync {
    /// Issues a GET request. Returns [`HarvestError::Transport`] only if no response was received at all.
    fn get(&self, url: &Url) -> Result<HttpResponse, HarvestError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse, HarvestError> {
        (**self).get(url)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for Box<T> {
    fn get(&self, url: &Url) -> Result<HttpResponse, HarvestError> {
        (**self).get(url)
    }
}

const USER_AGENT: &str = concat!("geoharvest/", env!("CARGO_PKG_VERSION"));

/// HTTP client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default 30 seconds timeout.
    pub fn new() -> Result<Self, HarvestError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a client with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HarvestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &Url) -> Result<HttpResponse, HarvestError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;
        debug!("GET {url}: {status}, {} bytes", body.len());

        Ok(HttpResponse { status, body })
    }
}
