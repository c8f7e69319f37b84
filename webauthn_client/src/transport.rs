//! HTTP seam between the ceremony and the network.

use crate::{config::ClientConfig, error::TransportError};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, StatusCode, Url};
use std::sync::Arc;

/// Answer to the challenge request, body included.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Answer to the submission. Its body is never read.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Sends the two requests of a ceremony.
///
/// An `Err` means no response was obtained at all. Any response the server
/// produced, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<HttpResponse, TransportError>;

    /// Resolves as soon as the status line and headers have arrived.
    async fn post(
        &self,
        url: &Url,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<SubmitResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<HttpResponse, TransportError> {
        (**self).get(url, headers).await
    }

    async fn post(
        &self,
        url: &Url,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<SubmitResponse, TransportError> {
        (**self).post(url, headers, body).await
    }
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Use an already configured client, e.g. one with custom TLS roots.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url, headers: HeaderMap) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url.clone()).headers(headers).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn post(
        &self,
        url: &Url,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<SubmitResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;
        Ok(SubmitResponse {
            status: response.status(),
            headers: response.headers().clone(),
        })
    }
}
