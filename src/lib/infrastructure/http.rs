//! HTTP transport

use std::time::Duration;

#[cfg(test)]
use mockall::mock;
use reqwest::{header::HeaderMap, Method};

use crate::domain::mail::errors::MailerError;

/// Upper bound on a single provider call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A fully prepared HTTP request
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method
    pub method: Method,

    /// The absolute request URL
    pub url: String,

    /// Request headers
    pub headers: HeaderMap,

    /// The serialized request body
    pub body: String,
}

/// The raw outcome of an HTTP call, uninterpreted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: u16,

    /// The response body
    pub body: String,
}

/// Performs one blocking HTTP round trip
pub trait HttpTransport: Send + Sync {
    /// Executes `request` on the calling thread.
    ///
    /// # Returns
    /// The raw [`HttpResponse`] whatever its status, or a
    /// [`MailerError::Transport`] if no response arrived.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError>;
}

#[cfg(test)]
mock! {
    pub HttpTransport {}

    impl HttpTransport for HttpTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError>;
    }
}

/// [`HttpTransport`] backed by a blocking reqwest client speaking HTTP/1.1
#[derive(Clone, Debug)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
}

impl BlockingTransport {
    /// Creates a transport with the standard [`REQUEST_TIMEOUT`]
    pub fn new() -> Result<Self, MailerError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Creates a transport with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, MailerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .http1_only()
            .build()?;

        Ok(Self { client })
    }
}

impl HttpTransport for BlockingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, MailerError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }
}
