//! Wire-level request and response types shared by all operations.

use bytes::Bytes;
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;

/// HTTP methods used by the MNS wire protocol.
///
/// The protocol only ever uses GET, PUT, and DELETE; there is deliberately no
/// way to construct any other method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Delete,
}

impl HttpMethod {
    /// Get the method as an uppercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generic service request produced by marshalling a typed request.
///
/// Built once per invocation and handed to the signer and then the transport.
/// Query parameter keys are unique; `BTreeMap` keeps them in a deterministic
/// order so signing and URL building agree. Header keys are stored lowercase
/// (HTTP headers are case-insensitive on the wire).
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub resource_path: String,
    pub parameters: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
}

impl WireRequest {
    /// Create a new wire request for a method and resource path
    pub fn new(method: HttpMethod, resource_path: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: resource_path.into(),
            parameters: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a query parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Attach an XML body and the matching content type header
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.set_header("content-type", "text/xml;charset=utf-8");
        self.body = Some(body);
        self
    }

    /// Set a header, normalizing the key to lowercase
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Canonical resource string used for signing: the resource path followed
    /// by the sorted query parameters, if any.
    pub fn canonical_resource(&self) -> String {
        if self.parameters.is_empty() {
            return self.resource_path.clone();
        }

        let query = self
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.resource_path, query)
    }
}

/// A generic service response consumed exactly once by an unmarshaller.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl WireResponse {
    /// Create a new wire response
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }

    /// Add a header, normalizing the key to lowercase
    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Check whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text, lossy on invalid sequences
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
