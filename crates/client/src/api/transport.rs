//! HTTP transport seam.
//!
//! The client speaks to the service through [`Transport`] so the request and
//! response handling can be exercised without a network.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header;

use super::error::ClientError;

/// An outgoing JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Path relative to the base URL, e.g. `/v1/validate`.
    pub path: String,
    /// Bearer credential.
    pub bearer: String,
    pub body: serde_json::Value,
}

/// Raw response: status code and body bytes.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request. Only transport-level failures are errors; any HTTP
    /// status comes back as an [`ApiResponse`].
    async fn post(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ClientError> {
        let parsed = url::Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!("unsupported scheme: {}", parsed.scheme())));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(ClientError::from)?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(&request.path);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&request.bearer)
            .header(header::ACCEPT, "application/json")
            .json(&request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::debug!("response status: {}, {} bytes", status, body.len());

        Ok(ApiResponse { status, body })
    }
}
