//! Message operations: send, receive, peek, delete, visibility.

use super::{
    message_resource, optional_timestamp, optional_u32, required_field, unmarshall_error_envelope,
    validate_batch_size, validate_wait_seconds, Operation, PARAM_BATCH_SIZE, PARAM_PEEK_ONLY,
    PARAM_RECEIPT_HANDLE, PARAM_VISIBILITY_TIMEOUT, PARAM_WAIT_SECONDS,
};
use crate::error::{BatchErrorItem, Error, ValidationError};
use crate::types::{Message, MessageId, QueueName, ReceiptHandle, Timestamp};
use crate::wire::{HttpMethod, WireRequest, WireResponse};
use crate::xml::{self, XmlBuilder};
use std::collections::HashMap;

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;

/// Largest delivery delay the service accepts, in seconds (7 days).
const MAX_DELAY_SECONDS: u32 = 604_800;

// ============================================================================
// Request Types
// ============================================================================

/// Request for sending a single message
#[derive(Debug, Clone)]
pub struct SendMessageRequest {
    pub message_body: String,
    pub delay_seconds: Option<u32>,
    pub priority: Option<u32>,
}

impl SendMessageRequest {
    /// Create a send request with a message body
    pub fn new(message_body: impl Into<String>) -> Self {
        Self {
            message_body: message_body.into(),
            delay_seconds: None,
            priority: None,
        }
    }

    /// Delay first delivery by the given number of seconds
    pub fn with_delay_seconds(mut self, seconds: u32) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }

    /// Set the message priority (1 is highest, 16 lowest)
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Request for sending a batch of messages
#[derive(Debug, Clone)]
pub struct BatchSendMessageRequest {
    pub entries: Vec<SendMessageRequest>,
}

impl BatchSendMessageRequest {
    /// Create a batch send request from individual entries
    pub fn new(entries: Vec<SendMessageRequest>) -> Self {
        Self { entries }
    }
}

/// Request for receiving a single message
#[derive(Debug, Clone, Default)]
pub struct ReceiveMessageRequest {
    /// Optional server-side long-poll wait in seconds
    pub wait_seconds: Option<u32>,
}

impl ReceiveMessageRequest {
    /// Create a receive request with service defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Long-poll server side for up to the given number of seconds
    pub fn with_wait_seconds(mut self, seconds: u32) -> Self {
        self.wait_seconds = Some(seconds);
        self
    }
}

/// Request for receiving a batch of messages
#[derive(Debug, Clone)]
pub struct BatchReceiveMessageRequest {
    pub batch_size: u32,
    pub wait_seconds: Option<u32>,
}

impl BatchReceiveMessageRequest {
    /// Create a batch receive request for up to `batch_size` messages
    pub fn new(batch_size: u32) -> Self {
        Self {
            batch_size,
            wait_seconds: None,
        }
    }

    /// Long-poll server side for up to the given number of seconds
    pub fn with_wait_seconds(mut self, seconds: u32) -> Self {
        self.wait_seconds = Some(seconds);
        self
    }
}

/// Request for peeking a batch of messages
#[derive(Debug, Clone)]
pub struct BatchPeekMessageRequest {
    pub batch_size: u32,
}

impl BatchPeekMessageRequest {
    /// Create a batch peek request for up to `batch_size` messages
    pub fn new(batch_size: u32) -> Self {
        Self { batch_size }
    }
}

/// Request for deleting a single message by its receipt handle
#[derive(Debug, Clone)]
pub struct DeleteMessageRequest {
    pub receipt_handle: ReceiptHandle,
}

impl DeleteMessageRequest {
    /// Create a delete request for a receipt handle
    pub fn new(receipt_handle: ReceiptHandle) -> Self {
        Self { receipt_handle }
    }
}

/// Request for deleting a batch of messages by their receipt handles
#[derive(Debug, Clone)]
pub struct BatchDeleteMessageRequest {
    pub receipt_handles: Vec<ReceiptHandle>,
}

impl BatchDeleteMessageRequest {
    /// Create a batch delete request for a set of receipt handles
    pub fn new(receipt_handles: Vec<ReceiptHandle>) -> Self {
        Self { receipt_handles }
    }
}

/// Request for changing the visibility timeout of a received message
#[derive(Debug, Clone)]
pub struct ChangeMessageVisibilityRequest {
    pub receipt_handle: ReceiptHandle,
    pub visibility_timeout: u32,
}

impl ChangeMessageVisibilityRequest {
    /// Create a visibility change request
    pub fn new(receipt_handle: ReceiptHandle, visibility_timeout: u32) -> Self {
        Self {
            receipt_handle,
            visibility_timeout,
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a single send
#[derive(Debug, Clone)]
pub struct SendMessageResponse {
    pub status: u16,
    pub message_id: MessageId,
    pub message_body_md5: String,
}

/// Acknowledgement for one entry of a batch send
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: MessageId,
    pub message_body_md5: String,
}

/// Response for a batch send
#[derive(Debug, Clone)]
pub struct BatchSendMessageResponse {
    pub status: u16,
    pub receipts: Vec<SendReceipt>,
}

/// Response for a single receive
#[derive(Debug, Clone)]
pub struct ReceiveMessageResponse {
    pub status: u16,
    pub message: Message,
}

/// Response for a batch receive
#[derive(Debug, Clone)]
pub struct BatchReceiveMessageResponse {
    pub status: u16,
    pub messages: Vec<Message>,
}

/// Response for a single peek
#[derive(Debug, Clone)]
pub struct PeekMessageResponse {
    pub status: u16,
    pub message: Message,
}

/// Response for a batch peek
#[derive(Debug, Clone)]
pub struct BatchPeekMessageResponse {
    pub status: u16,
    pub messages: Vec<Message>,
}

/// Response for a single delete
#[derive(Debug, Clone)]
pub struct DeleteMessageResponse {
    pub status: u16,
}

/// Response for a batch delete
#[derive(Debug, Clone)]
pub struct BatchDeleteMessageResponse {
    pub status: u16,
}

/// Response for a visibility change, carrying the replacement receipt handle
#[derive(Debug, Clone)]
pub struct ChangeMessageVisibilityResponse {
    pub status: u16,
    pub receipt_handle: ReceiptHandle,
    pub next_visible_time: Timestamp,
}

// ============================================================================
// Shared Parsing
// ============================================================================

fn message_from_fields(fields: &HashMap<String, String>) -> Result<Message, Error> {
    Ok(Message {
        id: MessageId::from(required_field(fields, "MessageId")?),
        receipt_handle: fields.get("ReceiptHandle").cloned().map(ReceiptHandle::from),
        body: required_field(fields, "MessageBody")?,
        body_md5: fields.get("MessageBodyMD5").cloned().unwrap_or_default(),
        enqueue_time: optional_timestamp(fields, "EnqueueTime")?,
        next_visible_time: optional_timestamp(fields, "NextVisibleTime")?,
        first_dequeue_time: optional_timestamp(fields, "FirstDequeueTime")?,
        dequeue_count: optional_u32(fields, "DequeueCount")?,
        priority: optional_u32(fields, "Priority")?,
    })
}

fn validate_send_entry(field: &str, entry: &SendMessageRequest) -> Result<(), ValidationError> {
    if entry.message_body.is_empty() {
        return Err(ValidationError::Required {
            field: format!("{}.message_body", field),
        });
    }
    if let Some(delay) = entry.delay_seconds {
        if delay > MAX_DELAY_SECONDS {
            return Err(ValidationError::OutOfRange {
                field: format!("{}.delay_seconds", field),
                message: format!("must be 0-{}", MAX_DELAY_SECONDS),
            });
        }
    }
    if let Some(priority) = entry.priority {
        if !(1..=16).contains(&priority) {
            return Err(ValidationError::OutOfRange {
                field: format!("{}.priority", field),
                message: "must be 1-16".to_string(),
            });
        }
    }
    Ok(())
}

fn write_message_elements(xml: &mut XmlBuilder, entry: &SendMessageRequest) {
    xml.element("MessageBody", &entry.message_body);
    xml.element_opt("DelaySeconds", &entry.delay_seconds);
    xml.element_opt("Priority", &entry.priority);
}

// ============================================================================
// Operations
// ============================================================================

pub(crate) struct SendMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a SendMessageRequest,
}

impl Operation for SendMessage<'_> {
    type Response = SendMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_send_entry("message", self.request)?;

        let mut xml = XmlBuilder::new("Message");
        write_message_elements(&mut xml, self.request);

        Ok(WireRequest::new(HttpMethod::Put, message_resource(self.queue)).with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(SendMessageResponse {
            status: response.status,
            message_id: MessageId::from(required_field(&fields, "MessageId")?),
            message_body_md5: fields.get("MessageBodyMD5").cloned().unwrap_or_default(),
        })
    }
}

pub(crate) struct BatchSendMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a BatchSendMessageRequest,
}

impl Operation for BatchSendMessage<'_> {
    type Response = BatchSendMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_batch_size("entries", self.request.entries.len() as u32)?;
        for entry in &self.request.entries {
            validate_send_entry("entries", entry)?;
        }

        let mut xml = XmlBuilder::new("Messages");
        for entry in &self.request.entries {
            xml.open("Message");
            write_message_elements(&mut xml, entry);
            xml.close("Message");
        }

        Ok(WireRequest::new(HttpMethod::Put, message_resource(self.queue)).with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let doc = xml::parse_grouped(&response.body_text(), "Message")?;
        let receipts = doc
            .items
            .iter()
            .map(|item| {
                Ok(SendReceipt {
                    message_id: MessageId::from(required_field(item, "MessageId")?),
                    message_body_md5: item.get("MessageBodyMD5").cloned().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(BatchSendMessageResponse {
            status: response.status,
            receipts,
        })
    }
}

pub(crate) struct ReceiveMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a ReceiveMessageRequest,
}

impl Operation for ReceiveMessage<'_> {
    type Response = ReceiveMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_wait_seconds(self.request.wait_seconds)?;

        let mut request = WireRequest::new(HttpMethod::Get, message_resource(self.queue));
        if let Some(seconds) = self.request.wait_seconds {
            request = request.with_parameter(PARAM_WAIT_SECONDS, seconds.to_string());
        }
        Ok(request)
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(ReceiveMessageResponse {
            status: response.status,
            message: message_from_fields(&fields)?,
        })
    }
}

pub(crate) struct BatchReceiveMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a BatchReceiveMessageRequest,
}

impl Operation for BatchReceiveMessage<'_> {
    type Response = BatchReceiveMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_batch_size("batch_size", self.request.batch_size)?;
        validate_wait_seconds(self.request.wait_seconds)?;

        let mut request = WireRequest::new(HttpMethod::Get, message_resource(self.queue))
            .with_parameter(PARAM_BATCH_SIZE, self.request.batch_size.to_string());
        if let Some(seconds) = self.request.wait_seconds {
            request = request.with_parameter(PARAM_WAIT_SECONDS, seconds.to_string());
        }
        Ok(request)
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let doc = xml::parse_grouped(&response.body_text(), "Message")?;
        let messages = doc
            .items
            .iter()
            .map(message_from_fields)
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(BatchReceiveMessageResponse {
            status: response.status,
            messages,
        })
    }
}

pub(crate) struct PeekMessage<'a> {
    pub queue: &'a QueueName,
}

impl Operation for PeekMessage<'_> {
    type Response = PeekMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Get, message_resource(self.queue))
            .with_parameter(PARAM_PEEK_ONLY, "true"))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(PeekMessageResponse {
            status: response.status,
            message: message_from_fields(&fields)?,
        })
    }
}

pub(crate) struct BatchPeekMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a BatchPeekMessageRequest,
}

impl Operation for BatchPeekMessage<'_> {
    type Response = BatchPeekMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_batch_size("batch_size", self.request.batch_size)?;

        Ok(WireRequest::new(HttpMethod::Get, message_resource(self.queue))
            .with_parameter(PARAM_PEEK_ONLY, "true")
            .with_parameter(PARAM_BATCH_SIZE, self.request.batch_size.to_string()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let doc = xml::parse_grouped(&response.body_text(), "Message")?;
        let messages = doc
            .items
            .iter()
            .map(message_from_fields)
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(BatchPeekMessageResponse {
            status: response.status,
            messages,
        })
    }
}

pub(crate) struct DeleteMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a DeleteMessageRequest,
}

impl Operation for DeleteMessage<'_> {
    type Response = DeleteMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        if self.request.receipt_handle.as_str().is_empty() {
            return Err(ValidationError::Required {
                field: "receipt_handle".to_string(),
            });
        }

        Ok(
            WireRequest::new(HttpMethod::Delete, message_resource(self.queue)).with_parameter(
                PARAM_RECEIPT_HANDLE,
                self.request.receipt_handle.as_str(),
            ),
        )
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(DeleteMessageResponse {
            status: response.status,
        })
    }
}

pub(crate) struct BatchDeleteMessage<'a> {
    pub queue: &'a QueueName,
    pub request: &'a BatchDeleteMessageRequest,
}

impl Operation for BatchDeleteMessage<'_> {
    type Response = BatchDeleteMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_batch_size("receipt_handles", self.request.receipt_handles.len() as u32)?;

        let mut xml = XmlBuilder::new("ReceiptHandles");
        for handle in &self.request.receipt_handles {
            xml.element("ReceiptHandle", handle.as_str());
        }

        Ok(WireRequest::new(HttpMethod::Delete, message_resource(self.queue))
            .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(BatchDeleteMessageResponse {
            status: response.status,
        })
    }

    /// A batch delete can fail for a subset of handles. The service reports
    /// those as repeated `<Error>` items, each naming the receipt handle it
    /// failed for; anything else falls back to the shared envelope mapping.
    fn unmarshall_error(&self, response: &WireResponse) -> Error {
        let text = response.body_text();
        if let Ok(doc) = xml::parse_grouped(&text, "Error") {
            let items: Vec<BatchErrorItem> = doc
                .items
                .iter()
                .filter_map(|item| {
                    item.get("ReceiptHandle").map(|handle| BatchErrorItem {
                        receipt_handle: handle.clone(),
                        code: item.get("ErrorCode").cloned().unwrap_or_default(),
                        message: item.get("ErrorMessage").cloned().unwrap_or_default(),
                    })
                })
                .collect();

            if !items.is_empty() {
                return Error::BatchDeletePartialFailure {
                    items,
                    request_id: response
                        .header("x-mns-request-id")
                        .unwrap_or_default()
                        .to_string(),
                };
            }
        }

        unmarshall_error_envelope(response)
    }
}

pub(crate) struct ChangeMessageVisibility<'a> {
    pub queue: &'a QueueName,
    pub request: &'a ChangeMessageVisibilityRequest,
}

impl Operation for ChangeMessageVisibility<'_> {
    type Response = ChangeMessageVisibilityResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        if self.request.receipt_handle.as_str().is_empty() {
            return Err(ValidationError::Required {
                field: "receipt_handle".to_string(),
            });
        }
        if !(1..=43_200).contains(&self.request.visibility_timeout) {
            return Err(ValidationError::OutOfRange {
                field: "visibility_timeout".to_string(),
                message: "must be 1-43200 seconds".to_string(),
            });
        }

        Ok(WireRequest::new(HttpMethod::Put, message_resource(self.queue))
            .with_parameter(PARAM_RECEIPT_HANDLE, self.request.receipt_handle.as_str())
            .with_parameter(
                PARAM_VISIBILITY_TIMEOUT,
                self.request.visibility_timeout.to_string(),
            ))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(ChangeMessageVisibilityResponse {
            status: response.status,
            receipt_handle: ReceiptHandle::from(required_field(&fields, "ReceiptHandle")?),
            next_visible_time: super::parse_timestamp(&required_field(
                &fields,
                "NextVisibleTime",
            )?)?,
        })
    }
}
