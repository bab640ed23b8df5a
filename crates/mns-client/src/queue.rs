//! Queue facade binding a queue name to the invocation pipeline.

use crate::codec;
use crate::error::Error;
use crate::ops::messages::{
    BatchDeleteMessage, BatchDeleteMessageRequest, BatchDeleteMessageResponse, BatchPeekMessage,
    BatchPeekMessageRequest, BatchPeekMessageResponse, BatchReceiveMessage,
    BatchReceiveMessageRequest, BatchReceiveMessageResponse, BatchSendMessage,
    BatchSendMessageRequest, BatchSendMessageResponse, ChangeMessageVisibility,
    ChangeMessageVisibilityRequest, ChangeMessageVisibilityResponse, DeleteMessage,
    DeleteMessageRequest, DeleteMessageResponse, PeekMessage, PeekMessageResponse, ReceiveMessage,
    ReceiveMessageRequest, ReceiveMessageResponse, SendMessage, SendMessageRequest,
    SendMessageResponse,
};
use crate::ops::queues::{
    CreateQueue, CreateQueueRequest, GetQueueAttributes, GetQueueAttributesResponse,
    SetQueueAttributes, SetQueueAttributesResponse,
};
use crate::pipeline::ServiceClient;
use crate::types::{MessageId, QueueAttributes, QueueName, ReceiptHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

/// Callback invoked when an automatic post-receive deletion fails, carrying
/// the failure and the ids of the affected messages.
pub type DeleteFailureCallback = Arc<dyn Fn(&Error, &[MessageId]) + Send + Sync>;

/// Typed facade over one named queue.
///
/// A facade is long-lived and may be shared across tasks. Its only mutable
/// state is a handful of flags with last-write-wins semantics: the cached
/// existence flag only ever moves from `false` to `true`, so concurrent
/// sends racing to set it are harmless.
pub struct Queue {
    name: QueueName,
    client: Arc<ServiceClient>,
    queue_exists: AtomicBool,
    check_queue_existence: AtomicBool,
    delete_on_received: AtomicBool,
    delete_failure_callback: RwLock<Option<DeleteFailureCallback>>,
}

impl Queue {
    pub(crate) fn new(name: QueueName, client: Arc<ServiceClient>) -> Self {
        Self {
            name,
            client,
            queue_exists: AtomicBool::new(false),
            check_queue_existence: AtomicBool::new(true),
            delete_on_received: AtomicBool::new(true),
            delete_failure_callback: RwLock::new(None),
        }
    }

    /// Get the queue name
    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Whether sends first make sure the queue exists (default true)
    pub fn check_queue_existence(&self) -> bool {
        self.check_queue_existence.load(Ordering::Relaxed)
    }

    /// Enable or disable the pre-send existence check
    pub fn set_check_queue_existence(&self, enabled: bool) {
        self.check_queue_existence.store(enabled, Ordering::Relaxed);
    }

    /// Whether received messages are deleted automatically (default true)
    pub fn delete_on_received(&self) -> bool {
        self.delete_on_received.load(Ordering::Relaxed)
    }

    /// Enable or disable automatic deletion of received messages
    pub fn set_delete_on_received(&self, enabled: bool) {
        self.delete_on_received.store(enabled, Ordering::Relaxed);
    }

    /// Register a callback for failures of the automatic post-receive
    /// deletion. Without a callback such failures are logged and swallowed;
    /// they never fail the receive itself.
    pub fn set_delete_failure_callback(
        &self,
        callback: impl Fn(&Error, &[MessageId]) + Send + Sync + 'static,
    ) {
        let mut guard = self
            .delete_failure_callback
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Remove a previously registered delete-failure callback
    pub fn clear_delete_failure_callback(&self) {
        let mut guard = self
            .delete_failure_callback
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Get the queue's attributes
    pub async fn get_attributes(&self) -> Result<GetQueueAttributesResponse, Error> {
        self.client
            .invoke(&GetQueueAttributes { queue: &self.name })
            .await
    }

    /// Overwrite the queue's writable attributes
    pub async fn set_attributes(
        &self,
        attributes: QueueAttributes,
    ) -> Result<SetQueueAttributesResponse, Error> {
        self.client
            .invoke(&SetQueueAttributes {
                queue: &self.name,
                attributes: &attributes,
            })
            .await
    }

    // ========================================================================
    // Send
    // ========================================================================

    /// Send a single message.
    ///
    /// The body is transcoded to the wire encoding before marshalling. When
    /// the existence check is enabled, the queue is created on first use; a
    /// queue that already exists counts as success.
    pub async fn send_message(
        &self,
        mut request: SendMessageRequest,
    ) -> Result<SendMessageResponse, Error> {
        request.message_body = codec::encode_body(&request.message_body);

        if self.check_queue_existence.load(Ordering::Relaxed) {
            self.ensure_queue_exists().await?;
        }

        self.client
            .invoke(&SendMessage {
                queue: &self.name,
                request: &request,
            })
            .await
    }

    /// Send a batch of messages, transcoding each body
    pub async fn batch_send_message(
        &self,
        mut request: BatchSendMessageRequest,
    ) -> Result<BatchSendMessageResponse, Error> {
        for entry in &mut request.entries {
            entry.message_body = codec::encode_body(&entry.message_body);
        }

        if self.check_queue_existence.load(Ordering::Relaxed) {
            self.ensure_queue_exists().await?;
        }

        self.client
            .invoke(&BatchSendMessage {
                queue: &self.name,
                request: &request,
            })
            .await
    }

    // ========================================================================
    // Receive
    // ========================================================================

    /// Receive a single message and decode its body.
    ///
    /// With `delete_on_received` enabled, an independent deletion is fired
    /// for the message. That deletion is best-effort: its failure never
    /// fails this receive and reaches the caller only through the
    /// delete-failure callback.
    pub async fn receive_message(
        &self,
        request: ReceiveMessageRequest,
    ) -> Result<ReceiveMessageResponse, Error> {
        let mut response = self
            .client
            .invoke(&ReceiveMessage {
                queue: &self.name,
                request: &request,
            })
            .await?;

        if self.delete_on_received.load(Ordering::Relaxed) {
            if let Some(handle) = response.message.receipt_handle.clone() {
                self.spawn_delete_received(vec![handle], vec![response.message.id.clone()]);
            }
        }

        response.message.body = codec::decode_body(&response.message.body)?;
        Ok(response)
    }

    /// Receive a batch of messages and decode their bodies
    pub async fn batch_receive_message(
        &self,
        request: BatchReceiveMessageRequest,
    ) -> Result<BatchReceiveMessageResponse, Error> {
        let mut response = self
            .client
            .invoke(&BatchReceiveMessage {
                queue: &self.name,
                request: &request,
            })
            .await?;

        if self.delete_on_received.load(Ordering::Relaxed) {
            let handles: Vec<ReceiptHandle> = response
                .messages
                .iter()
                .filter_map(|m| m.receipt_handle.clone())
                .collect();
            if !handles.is_empty() {
                let ids = response.messages.iter().map(|m| m.id.clone()).collect();
                self.spawn_delete_received(handles, ids);
            }
        }

        for message in &mut response.messages {
            message.body = codec::decode_body(&message.body)?;
        }
        Ok(response)
    }

    // ========================================================================
    // Peek
    // ========================================================================

    /// Peek the next message without consuming it
    pub async fn peek_message(&self) -> Result<PeekMessageResponse, Error> {
        let mut response = self
            .client
            .invoke(&PeekMessage { queue: &self.name })
            .await?;
        response.message.body = codec::decode_body(&response.message.body)?;
        Ok(response)
    }

    /// Peek a batch of messages without consuming them
    pub async fn batch_peek_message(
        &self,
        request: BatchPeekMessageRequest,
    ) -> Result<BatchPeekMessageResponse, Error> {
        let mut response = self
            .client
            .invoke(&BatchPeekMessage {
                queue: &self.name,
                request: &request,
            })
            .await?;
        for message in &mut response.messages {
            message.body = codec::decode_body(&message.body)?;
        }
        Ok(response)
    }

    // ========================================================================
    // Delete and Visibility
    // ========================================================================

    /// Delete a message by its receipt handle
    pub async fn delete_message(
        &self,
        request: DeleteMessageRequest,
    ) -> Result<DeleteMessageResponse, Error> {
        self.client
            .invoke(&DeleteMessage {
                queue: &self.name,
                request: &request,
            })
            .await
    }

    /// Delete a batch of messages by their receipt handles
    pub async fn batch_delete_message(
        &self,
        request: BatchDeleteMessageRequest,
    ) -> Result<BatchDeleteMessageResponse, Error> {
        self.client
            .invoke(&BatchDeleteMessage {
                queue: &self.name,
                request: &request,
            })
            .await
    }

    /// Change the visibility timeout of a received message
    pub async fn change_message_visibility(
        &self,
        request: ChangeMessageVisibilityRequest,
    ) -> Result<ChangeMessageVisibilityResponse, Error> {
        self.client
            .invoke(&ChangeMessageVisibility {
                queue: &self.name,
                request: &request,
            })
            .await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Create the queue if this facade has not yet confirmed it exists.
    ///
    /// "Already exists" counts the same as a fresh creation. The confirmed
    /// flag is a cache only; it never moves back to `false`.
    async fn ensure_queue_exists(&self) -> Result<(), Error> {
        if self.queue_exists.load(Ordering::Acquire) {
            return Ok(());
        }

        let request = CreateQueueRequest::new(self.name.clone());
        match self.client.invoke(&CreateQueue { request: &request }).await {
            Ok(_) | Err(Error::QueueAlreadyExists(_)) => {
                self.queue_exists.store(true, Ordering::Release);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Fire an independent deletion for received messages.
    ///
    /// The task is deliberately not linked to the receive's own future.
    fn spawn_delete_received(&self, handles: Vec<ReceiptHandle>, ids: Vec<MessageId>) {
        let client = Arc::clone(&self.client);
        let queue = self.name.clone();
        let callback = self
            .delete_failure_callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tokio::spawn(async move {
            let result = if let [handle] = handles.as_slice() {
                let request = DeleteMessageRequest::new(handle.clone());
                client
                    .invoke(&DeleteMessage {
                        queue: &queue,
                        request: &request,
                    })
                    .await
                    .map(|_| ())
            } else {
                let request = BatchDeleteMessageRequest::new(handles);
                client
                    .invoke(&BatchDeleteMessage {
                        queue: &queue,
                        request: &request,
                    })
                    .await
                    .map(|_| ())
            };

            if let Err(error) = result {
                match callback {
                    Some(callback) => callback(&error, &ids),
                    None => tracing::warn!(
                        queue = %queue,
                        error = %error,
                        "failed to delete received message(s)"
                    ),
                }
            }
        });
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("queue_exists", &self.queue_exists)
            .field("check_queue_existence", &self.check_queue_existence)
            .field("delete_on_received", &self.delete_on_received)
            .finish()
    }
}
