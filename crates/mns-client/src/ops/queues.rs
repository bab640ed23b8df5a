//! Queue lifecycle operations: create, delete, list, attributes.

use super::{
    optional_timestamp, optional_u32, optional_u64, queue_resource, trailing_segment,
    validate_max_returns, Operation, PARAM_MARKER, PARAM_MAX_RETURNS, PARAM_META_OVERRIDE,
    PARAM_PREFIX,
};
use crate::error::{Error, ValidationError};
use crate::types::{QueueAttributes, QueueName};
use crate::wire::{HttpMethod, WireRequest, WireResponse};
use crate::xml::{self, XmlBuilder};

#[cfg(test)]
#[path = "queues_tests.rs"]
mod tests;

// ============================================================================
// Request Types
// ============================================================================

/// Request for creating a queue
#[derive(Debug, Clone)]
pub struct CreateQueueRequest {
    pub queue_name: QueueName,
    pub attributes: QueueAttributes,
}

impl CreateQueueRequest {
    /// Create a request with service-default attributes
    pub fn new(queue_name: QueueName) -> Self {
        Self {
            queue_name,
            attributes: QueueAttributes::default(),
        }
    }

    /// Set initial queue attributes
    pub fn with_attributes(mut self, attributes: QueueAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Request for listing queues, one page at a time
#[derive(Debug, Clone, Default)]
pub struct ListQueueRequest {
    /// Only return queues whose name starts with this prefix
    pub prefix: Option<String>,
    /// Continuation marker from the previous page
    pub marker: Option<String>,
    /// Page size
    pub max_returns: Option<u32>,
}

impl ListQueueRequest {
    /// Create a request for the first page with service defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list queues whose name starts with the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Continue listing from a marker returned by the previous page
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Limit the number of queues returned per page
    pub fn with_max_returns(mut self, max_returns: u32) -> Self {
        self.max_returns = Some(max_returns);
        self
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a queue creation
#[derive(Debug, Clone)]
pub struct CreateQueueResponse {
    pub status: u16,
    /// URL of the created queue, from the `Location` header
    pub queue_url: String,
}

impl CreateQueueResponse {
    /// Name of the created queue: the trailing segment of its URL
    pub fn queue_name(&self) -> &str {
        trailing_segment(&self.queue_url)
    }
}

/// Response for a queue deletion
#[derive(Debug, Clone)]
pub struct DeleteQueueResponse {
    pub status: u16,
}

/// One page of queue URLs.
///
/// An absent `next_marker` means this is the last page; a paging loop must
/// stop instead of requesting further pages.
#[derive(Debug, Clone)]
pub struct ListQueueResponse {
    pub status: u16,
    pub queue_urls: Vec<String>,
    pub next_marker: Option<String>,
}

/// Response carrying the queue's current attributes
#[derive(Debug, Clone)]
pub struct GetQueueAttributesResponse {
    pub status: u16,
    pub attributes: QueueAttributes,
}

/// Response for an attribute update
#[derive(Debug, Clone)]
pub struct SetQueueAttributesResponse {
    pub status: u16,
}

// ============================================================================
// Operations
// ============================================================================

fn write_queue_attributes(xml: &mut XmlBuilder, attributes: &QueueAttributes) {
    xml.element_opt("VisibilityTimeout", &attributes.visibility_timeout);
    xml.element_opt("MaximumMessageSize", &attributes.maximum_message_size);
    xml.element_opt(
        "MessageRetentionPeriod",
        &attributes.message_retention_period,
    );
    xml.element_opt("DelaySeconds", &attributes.delay_seconds);
    xml.element_opt("PollingWaitSeconds", &attributes.polling_wait_seconds);
}

fn queue_attributes_from_response(response: &WireResponse) -> Result<QueueAttributes, Error> {
    let fields = xml::parse_flat(&response.body_text())?;
    Ok(QueueAttributes {
        visibility_timeout: optional_u32(&fields, "VisibilityTimeout")?,
        maximum_message_size: optional_u32(&fields, "MaximumMessageSize")?,
        message_retention_period: optional_u32(&fields, "MessageRetentionPeriod")?,
        delay_seconds: optional_u32(&fields, "DelaySeconds")?,
        polling_wait_seconds: optional_u32(&fields, "PollingWaitSeconds")?,
        queue_name: fields.get("QueueName").cloned(),
        create_time: optional_timestamp(&fields, "CreateTime")?,
        last_modify_time: optional_timestamp(&fields, "LastModifyTime")?,
        active_messages: optional_u64(&fields, "ActiveMessages")?,
        inactive_messages: optional_u64(&fields, "InactiveMessages")?,
        delay_messages: optional_u64(&fields, "DelayMessages")?,
    })
}

pub(crate) struct CreateQueue<'a> {
    pub request: &'a CreateQueueRequest,
}

impl Operation for CreateQueue<'_> {
    type Response = CreateQueueResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        let mut xml = XmlBuilder::new("Queue");
        write_queue_attributes(&mut xml, &self.request.attributes);

        Ok(
            WireRequest::new(HttpMethod::Put, queue_resource(&self.request.queue_name))
                .with_body(xml.finish()),
        )
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(CreateQueueResponse {
            status: response.status,
            queue_url: response.header("location").unwrap_or_default().to_string(),
        })
    }
}

pub(crate) struct DeleteQueue<'a> {
    pub queue: &'a QueueName,
}

impl Operation for DeleteQueue<'_> {
    type Response = DeleteQueueResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Delete, queue_resource(self.queue)))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(DeleteQueueResponse {
            status: response.status,
        })
    }
}

pub(crate) struct ListQueue<'a> {
    pub request: &'a ListQueueRequest,
}

impl Operation for ListQueue<'_> {
    type Response = ListQueueResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_max_returns(self.request.max_returns)?;

        let mut request = WireRequest::new(HttpMethod::Get, "/queues");
        if let Some(ref prefix) = self.request.prefix {
            request = request.with_parameter(PARAM_PREFIX, prefix.clone());
        }
        if let Some(ref marker) = self.request.marker {
            request = request.with_parameter(PARAM_MARKER, marker.clone());
        }
        if let Some(number) = self.request.max_returns {
            request = request.with_parameter(PARAM_MAX_RETURNS, number.to_string());
        }
        Ok(request)
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let doc = xml::parse_grouped(&response.body_text(), "Queue")?;
        let queue_urls = doc
            .items
            .iter()
            .filter_map(|item| item.get("QueueURL").cloned())
            .collect();

        Ok(ListQueueResponse {
            status: response.status,
            queue_urls,
            next_marker: doc.fields.get("NextMarker").cloned().filter(|m| !m.is_empty()),
        })
    }
}

pub(crate) struct GetQueueAttributes<'a> {
    pub queue: &'a QueueName,
}

impl Operation for GetQueueAttributes<'_> {
    type Response = GetQueueAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Get, queue_resource(self.queue)))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(GetQueueAttributesResponse {
            status: response.status,
            attributes: queue_attributes_from_response(response)?,
        })
    }
}

pub(crate) struct SetQueueAttributes<'a> {
    pub queue: &'a QueueName,
    pub attributes: &'a QueueAttributes,
}

impl Operation for SetQueueAttributes<'_> {
    type Response = SetQueueAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        let mut xml = XmlBuilder::new("Queue");
        write_queue_attributes(&mut xml, self.attributes);

        Ok(WireRequest::new(HttpMethod::Put, queue_resource(self.queue))
            .with_parameter(PARAM_META_OVERRIDE, "true")
            .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(SetQueueAttributesResponse {
            status: response.status,
        })
    }
}
