//! HTTP transport boundary.

use crate::error::TransportError;
use crate::pipeline::ClientConfig;
use crate::wire::{HttpMethod, WireRequest, WireResponse};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use url::Url;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

/// Interface for dispatching a signed wire request and collecting the raw
/// response.
///
/// Implementations execute concurrently; cancellation and timeouts live
/// here, not in the pipeline.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError>;
}

/// Default transport over a pooled `reqwest` client
pub struct HttpTransport {
    http_client: ReqwestClient,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport bound to a service endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(endpoint: Url, config: &ClientConfig) -> Result<Self, TransportError> {
        let http_client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::ConnectionFailed {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    fn build_url(&self, request: &WireRequest) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = format!("{}{}", base, request.resource_path);

        if !request.parameters.is_empty() {
            let query = request
                .parameters
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{}?{}", url, query);
        }

        url
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let url = self.build_url(&request);

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut http_request = self.http_client.request(method, &url);
        for (key, value) in &request.headers {
            http_request = http_request.header(key, value);
        }
        if let Some(body) = request.body {
            http_request = http_request.body(body);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    message: e.to_string(),
                }
            } else {
                TransportError::ConnectionFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: format!("failed to read response body: {}", e),
            })?;

        let mut wire_response = WireResponse::new(status, body);
        for (name, value) in headers.iter() {
            if let Ok(value) = value.to_str() {
                wire_response = wire_response.with_header(name.as_str(), value);
            }
        }

        Ok(wire_response)
    }
}
