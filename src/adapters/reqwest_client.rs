//! Production HttpClient on top of reqwest.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};

use crate::config::ClientConfig;
use crate::traits::{Headers, HttpClient, HttpError, Response, StreamResponse};

/// Map a reqwest error onto the transport error kinds the core understands.
pub fn classify_reqwest_error(err: &reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(err.to_string())
    } else if err.is_connect() {
        HttpError::ConnectionFailed(err.to_string())
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else if err.is_body() || err.is_decode() {
        HttpError::Io(err.to_string())
    } else {
        HttpError::Other(err.to_string())
    }
}

/// reqwest-backed client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Client without timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Client honouring the timeouts in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn apply_headers(mut request: RequestBuilder, headers: &Headers) -> RequestBuilder {
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    async fn buffer(response: reqwest::Response) -> Result<Response, HttpError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Ok(Response::new(status, body))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let response = Self::apply_headers(self.client.get(url), headers)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::buffer(response).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let response = Self::apply_headers(self.client.post(url), headers)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Self::buffer(response).await
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        let response = Self::apply_headers(self.client.post(url), headers)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| classify_reqwest_error(&e)));

        Ok(StreamResponse::new(
            status.as_u16(),
            status.canonical_reason().map(String::from),
            Box::pin(body),
        ))
    }
}
