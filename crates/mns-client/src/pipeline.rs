//! Invocation pipeline: marshall, sign, send, unmarshall.

use crate::error::Error;
use crate::ops::Operation;
use crate::signer::{Credentials, RequestSigner};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

/// Configuration for client behavior.
///
/// Controls the request timeout and user agent used by the default HTTP
/// transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for service requests
    pub user_agent: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "mns-client/0.1.0".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Executes one operation invocation end to end.
///
/// Each invocation runs marshall, sign, send, then either the success or the
/// error unmarshaller, and resolves to exactly one terminal outcome. The
/// client holds no locks and no per-call state outside the invocation's own
/// future, so concurrent invocations never interfere.
pub(crate) struct ServiceClient {
    transport: Arc<dyn Transport>,
    signer: Arc<dyn RequestSigner>,
    credentials: Credentials,
}

impl ServiceClient {
    /// Create a new service client from its collaborators
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        signer: Arc<dyn RequestSigner>,
        credentials: Credentials,
    ) -> Self {
        Self {
            transport,
            signer,
            credentials,
        }
    }

    /// Invoke one operation against the service.
    ///
    /// Marshalling failures (malformed caller input) surface before any I/O
    /// as [`Error::Validation`], so they are never confused with service-side
    /// failures.
    pub(crate) async fn invoke<O: Operation>(&self, operation: &O) -> Result<O::Response, Error> {
        let mut request = operation.marshall()?;
        self.signer.sign(&mut request, &self.credentials)?;

        tracing::debug!(
            method = request.method.as_str(),
            resource = %request.resource_path,
            "dispatching service request"
        );

        let response = self.transport.send(request).await?;

        if response.is_success() {
            operation.unmarshall(&response)
        } else {
            Err(operation.unmarshall_error(&response))
        }
    }
}
