//! Top-level client: credentials, endpoint, and facade factory.

use crate::error::{Error, TransportError, ValidationError};
use crate::ops::account::{
    GetAccountAttributes, GetAccountAttributesResponse, SetAccountAttributes,
    SetAccountAttributesResponse,
};
use crate::ops::queues::{
    CreateQueue, CreateQueueRequest, DeleteQueue, DeleteQueueResponse, ListQueue, ListQueueRequest,
    ListQueueResponse,
};
use crate::ops::topics::{
    CreateTopic, CreateTopicRequest, DeleteTopic, DeleteTopicResponse, ListTopic,
    ListTopicRequest, ListTopicResponse,
};
use crate::ops::trailing_segment;
use crate::pipeline::{ClientConfig, ServiceClient};
use crate::queue::Queue;
use crate::signer::{Credentials, MnsSigner, RequestSigner};
use crate::topic::Topic;
use crate::transport::{HttpTransport, Transport};
use crate::types::{AccountAttributes, QueueName, TopicName};
use std::sync::Arc;
use url::Url;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Client for the MNS message queue and topic service.
///
/// Holds the credentials and endpoint, exposes account-level operations, and
/// acts as the factory for [`Queue`] and [`Topic`] facades. Many facades may
/// share one client; the client itself is cheap to clone.
///
/// # Examples
///
/// ```no_run
/// use mns_client::{MnsClient, QueueName, SendMessageRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MnsClient::new(
///     "access-key-id",
///     "access-key-secret",
///     "https://account.mns.region.example.com",
/// )?;
///
/// let queue = client.queue(QueueName::new("orders")?);
/// let response = queue.send_message(SendMessageRequest::new("hello")).await?;
/// println!("sent {}", response.message_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MnsClient {
    service: Arc<ServiceClient>,
}

impl MnsClient {
    /// Create a client from an access key pair and a region endpoint
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        endpoint: &str,
    ) -> Result<Self, Error> {
        Self::builder()
            .credentials(Credentials::new(access_key_id, access_key_secret))
            .endpoint(endpoint)
            .build()
    }

    /// Create a builder for a client with non-default collaborators
    pub fn builder() -> MnsClientBuilder {
        MnsClientBuilder::new()
    }

    /// Get a queue facade bound to this client
    pub fn queue(&self, name: QueueName) -> Queue {
        Queue::new(name, Arc::clone(&self.service))
    }

    /// Get a topic facade bound to this client
    pub fn topic(&self, name: TopicName) -> Topic {
        Topic::new(name, Arc::clone(&self.service))
    }

    // ========================================================================
    // Queue Lifecycle
    // ========================================================================

    /// Create a queue and return a facade bound to it.
    ///
    /// The facade's name is taken from the trailing segment of the created
    /// resource's URL; when the service omits the `Location` header the
    /// requested name is used.
    pub async fn create_queue(&self, request: CreateQueueRequest) -> Result<Queue, Error> {
        let response = self.service.invoke(&CreateQueue { request: &request }).await?;

        let name = QueueName::new(trailing_segment(&response.queue_url))
            .unwrap_or_else(|_| request.queue_name.clone());
        Ok(Queue::new(name, Arc::clone(&self.service)))
    }

    /// Delete a queue by name
    pub async fn delete_queue(&self, queue_name: &QueueName) -> Result<DeleteQueueResponse, Error> {
        self.service.invoke(&DeleteQueue { queue: queue_name }).await
    }

    /// List queues, one page at a time.
    ///
    /// A response without a `next_marker` is the last page; callers drive
    /// the paging loop and must stop there.
    pub async fn list_queues(&self, request: ListQueueRequest) -> Result<ListQueueResponse, Error> {
        self.service.invoke(&ListQueue { request: &request }).await
    }

    // ========================================================================
    // Topic Lifecycle
    // ========================================================================

    /// Create a topic and return a facade bound to it
    pub async fn create_topic(&self, request: CreateTopicRequest) -> Result<Topic, Error> {
        let response = self.service.invoke(&CreateTopic { request: &request }).await?;

        let name = TopicName::new(trailing_segment(&response.topic_url))
            .unwrap_or_else(|_| request.topic_name.clone());
        Ok(Topic::new(name, Arc::clone(&self.service)))
    }

    /// Delete a topic by name
    pub async fn delete_topic(&self, topic_name: &TopicName) -> Result<DeleteTopicResponse, Error> {
        self.service.invoke(&DeleteTopic { topic: topic_name }).await
    }

    /// List topics, one page at a time
    pub async fn list_topics(&self, request: ListTopicRequest) -> Result<ListTopicResponse, Error> {
        self.service.invoke(&ListTopic { request: &request }).await
    }

    // ========================================================================
    // Account Attributes
    // ========================================================================

    /// Get the account's attributes
    pub async fn get_account_attributes(&self) -> Result<GetAccountAttributesResponse, Error> {
        self.service.invoke(&GetAccountAttributes).await
    }

    /// Overwrite the account's attributes
    pub async fn set_account_attributes(
        &self,
        attributes: AccountAttributes,
    ) -> Result<SetAccountAttributesResponse, Error> {
        self.service
            .invoke(&SetAccountAttributes {
                attributes: &attributes,
            })
            .await
    }
}

impl std::fmt::Debug for MnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnsClient").finish()
    }
}

/// Builder for constructing [`MnsClient`] instances.
pub struct MnsClientBuilder {
    credentials: Option<Credentials>,
    endpoint: Option<String>,
    config: ClientConfig,
    signer: Option<Arc<dyn RequestSigner>>,
    transport: Option<Arc<dyn Transport>>,
}

impl MnsClientBuilder {
    fn new() -> Self {
        Self {
            credentials: None,
            endpoint: None,
            config: ClientConfig::default(),
            signer: None,
            transport: None,
        }
    }

    /// Set the account credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the region endpoint, e.g. `https://account.mns.region.example.com`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the client configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default request signer
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Replace the default HTTP transport. When a transport is supplied no
    /// endpoint is required; the transport owns request routing.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error when credentials are missing, when no transport and
    /// no valid endpoint were supplied, or when the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<MnsClient, Error> {
        let credentials = self.credentials.ok_or_else(|| {
            Error::Validation(ValidationError::Required {
                field: "credentials".to_string(),
            })
        })?;

        let signer = self
            .signer
            .unwrap_or_else(|| Arc::new(MnsSigner::new()) as Arc<dyn RequestSigner>);

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let endpoint = self.endpoint.ok_or_else(|| {
                    Error::Validation(ValidationError::Required {
                        field: "endpoint".to_string(),
                    })
                })?;
                let url = Url::parse(&endpoint).map_err(|e| {
                    Error::Transport(TransportError::InvalidEndpoint {
                        message: format!("{}: {}", endpoint, e),
                    })
                })?;
                Arc::new(HttpTransport::new(url, &self.config)?) as Arc<dyn Transport>
            }
        };

        Ok(MnsClient {
            service: Arc::new(ServiceClient::new(transport, signer, credentials)),
        })
    }
}

impl Default for MnsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
