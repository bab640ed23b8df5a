//! Topic and subscription operations.

use super::{
    optional_timestamp, optional_u32, subscription_resource, topic_resource, trailing_segment,
    validate_max_returns, Operation, PARAM_MARKER, PARAM_MAX_RETURNS, PARAM_META_OVERRIDE,
    PARAM_PREFIX,
};
use crate::error::{Error, ValidationError};
use crate::types::{
    validate_resource_name, MessageId, NotifyStrategy, SubscriptionAttributes, TopicAttributes,
    TopicName,
};
use crate::wire::{HttpMethod, WireRequest, WireResponse};
use crate::xml::{self, XmlBuilder};

#[cfg(test)]
#[path = "topics_tests.rs"]
mod tests;

// ============================================================================
// Request Types
// ============================================================================

/// Request for creating a topic
#[derive(Debug, Clone)]
pub struct CreateTopicRequest {
    pub topic_name: TopicName,
    pub attributes: TopicAttributes,
}

impl CreateTopicRequest {
    /// Create a request with service-default attributes
    pub fn new(topic_name: TopicName) -> Self {
        Self {
            topic_name,
            attributes: TopicAttributes::default(),
        }
    }

    /// Set initial topic attributes
    pub fn with_attributes(mut self, attributes: TopicAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Request for listing topics, one page at a time
#[derive(Debug, Clone, Default)]
pub struct ListTopicRequest {
    pub prefix: Option<String>,
    pub marker: Option<String>,
    pub max_returns: Option<u32>,
}

impl ListTopicRequest {
    /// Create a request for the first page with service defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list topics whose name starts with the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Continue listing from a marker returned by the previous page
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Limit the number of topics returned per page
    pub fn with_max_returns(mut self, max_returns: u32) -> Self {
        self.max_returns = Some(max_returns);
        self
    }
}

/// Request for subscribing an endpoint to a topic
#[derive(Debug, Clone)]
pub struct SubscribeRequest {
    pub subscription_name: String,
    pub endpoint: String,
    pub notify_strategy: Option<NotifyStrategy>,
}

impl SubscribeRequest {
    /// Create a subscribe request for an endpoint
    pub fn new(subscription_name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            subscription_name: subscription_name.into(),
            endpoint: endpoint.into(),
            notify_strategy: None,
        }
    }

    /// Set the retry strategy used when pushing to the endpoint fails
    pub fn with_notify_strategy(mut self, strategy: NotifyStrategy) -> Self {
        self.notify_strategy = Some(strategy);
        self
    }
}

/// Request for updating a subscription's notify strategy
#[derive(Debug, Clone)]
pub struct SetSubscriptionAttributesRequest {
    pub subscription_name: String,
    pub notify_strategy: NotifyStrategy,
}

impl SetSubscriptionAttributesRequest {
    /// Create an update request
    pub fn new(subscription_name: impl Into<String>, notify_strategy: NotifyStrategy) -> Self {
        Self {
            subscription_name: subscription_name.into(),
            notify_strategy,
        }
    }
}

/// Request for listing a topic's subscriptions, one page at a time
#[derive(Debug, Clone, Default)]
pub struct ListSubscriptionRequest {
    pub prefix: Option<String>,
    pub marker: Option<String>,
    pub max_returns: Option<u32>,
}

impl ListSubscriptionRequest {
    /// Create a request for the first page with service defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list subscriptions whose name starts with the prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Continue listing from a marker returned by the previous page
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Limit the number of subscriptions returned per page
    pub fn with_max_returns(mut self, max_returns: u32) -> Self {
        self.max_returns = Some(max_returns);
        self
    }
}

/// Request for publishing a message to a topic
#[derive(Debug, Clone)]
pub struct PublishMessageRequest {
    pub message_body: String,
}

impl PublishMessageRequest {
    /// Create a publish request with a message body
    pub fn new(message_body: impl Into<String>) -> Self {
        Self {
            message_body: message_body.into(),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a topic creation
#[derive(Debug, Clone)]
pub struct CreateTopicResponse {
    pub status: u16,
    /// URL of the created topic, from the `Location` header
    pub topic_url: String,
}

impl CreateTopicResponse {
    /// Name of the created topic: the trailing segment of its URL
    pub fn topic_name(&self) -> &str {
        trailing_segment(&self.topic_url)
    }
}

/// Response for a topic deletion
#[derive(Debug, Clone)]
pub struct DeleteTopicResponse {
    pub status: u16,
}

/// One page of topic URLs
#[derive(Debug, Clone)]
pub struct ListTopicResponse {
    pub status: u16,
    pub topic_urls: Vec<String>,
    pub next_marker: Option<String>,
}

/// Response carrying the topic's current attributes
#[derive(Debug, Clone)]
pub struct GetTopicAttributesResponse {
    pub status: u16,
    pub attributes: TopicAttributes,
}

/// Response for a topic attribute update
#[derive(Debug, Clone)]
pub struct SetTopicAttributesResponse {
    pub status: u16,
}

/// Response for a subscription
#[derive(Debug, Clone)]
pub struct SubscribeResponse {
    pub status: u16,
    /// URL of the created subscription, from the `Location` header
    pub subscription_url: String,
}

/// Response for an unsubscription
#[derive(Debug, Clone)]
pub struct UnsubscribeResponse {
    pub status: u16,
}

/// Response carrying a subscription's current attributes
#[derive(Debug, Clone)]
pub struct GetSubscriptionAttributesResponse {
    pub status: u16,
    pub attributes: SubscriptionAttributes,
}

/// Response for a subscription attribute update
#[derive(Debug, Clone)]
pub struct SetSubscriptionAttributesResponse {
    pub status: u16,
}

/// One page of subscription URLs
#[derive(Debug, Clone)]
pub struct ListSubscriptionResponse {
    pub status: u16,
    pub subscription_urls: Vec<String>,
    pub next_marker: Option<String>,
}

/// Response for a topic publish
#[derive(Debug, Clone)]
pub struct PublishMessageResponse {
    pub status: u16,
    pub message_id: MessageId,
    pub message_body_md5: String,
}

// ============================================================================
// Operations
// ============================================================================

fn write_topic_attributes(xml: &mut XmlBuilder, attributes: &TopicAttributes) {
    xml.element_opt("MaximumMessageSize", &attributes.maximum_message_size);
    xml.element_opt(
        "MessageRetentionPeriod",
        &attributes.message_retention_period,
    );
}

pub(crate) struct CreateTopic<'a> {
    pub request: &'a CreateTopicRequest,
}

impl Operation for CreateTopic<'_> {
    type Response = CreateTopicResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        let mut xml = XmlBuilder::new("Topic");
        write_topic_attributes(&mut xml, &self.request.attributes);

        Ok(
            WireRequest::new(HttpMethod::Put, topic_resource(&self.request.topic_name))
                .with_body(xml.finish()),
        )
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(CreateTopicResponse {
            status: response.status,
            topic_url: response.header("location").unwrap_or_default().to_string(),
        })
    }
}

pub(crate) struct DeleteTopic<'a> {
    pub topic: &'a TopicName,
}

impl Operation for DeleteTopic<'_> {
    type Response = DeleteTopicResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Delete, topic_resource(self.topic)))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(DeleteTopicResponse {
            status: response.status,
        })
    }
}

pub(crate) struct ListTopic<'a> {
    pub request: &'a ListTopicRequest,
}

impl Operation for ListTopic<'_> {
    type Response = ListTopicResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_max_returns(self.request.max_returns)?;

        let mut request = WireRequest::new(HttpMethod::Get, "/topics");
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
        let doc = xml::parse_grouped(&response.body_text(), "Topic")?;
        let topic_urls = doc
            .items
            .iter()
            .filter_map(|item| item.get("TopicURL").cloned())
            .collect();

        Ok(ListTopicResponse {
            status: response.status,
            topic_urls,
            next_marker: doc.fields.get("NextMarker").cloned().filter(|m| !m.is_empty()),
        })
    }
}

pub(crate) struct GetTopicAttributes<'a> {
    pub topic: &'a TopicName,
}

impl Operation for GetTopicAttributes<'_> {
    type Response = GetTopicAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Get, topic_resource(self.topic)))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(GetTopicAttributesResponse {
            status: response.status,
            attributes: TopicAttributes {
                maximum_message_size: optional_u32(&fields, "MaximumMessageSize")?,
                message_retention_period: optional_u32(&fields, "MessageRetentionPeriod")?,
                topic_name: fields.get("TopicName").cloned(),
                create_time: optional_timestamp(&fields, "CreateTime")?,
                last_modify_time: optional_timestamp(&fields, "LastModifyTime")?,
            },
        })
    }
}

pub(crate) struct SetTopicAttributes<'a> {
    pub topic: &'a TopicName,
    pub attributes: &'a TopicAttributes,
}

impl Operation for SetTopicAttributes<'_> {
    type Response = SetTopicAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        let mut xml = XmlBuilder::new("Topic");
        write_topic_attributes(&mut xml, self.attributes);

        Ok(WireRequest::new(HttpMethod::Put, topic_resource(self.topic))
            .with_parameter(PARAM_META_OVERRIDE, "true")
            .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(SetTopicAttributesResponse {
            status: response.status,
        })
    }
}

pub(crate) struct Subscribe<'a> {
    pub topic: &'a TopicName,
    pub request: &'a SubscribeRequest,
}

impl Operation for Subscribe<'_> {
    type Response = SubscribeResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_resource_name("subscription_name", &self.request.subscription_name)?;
        if self.request.endpoint.is_empty() {
            return Err(ValidationError::Required {
                field: "endpoint".to_string(),
            });
        }

        let mut xml = XmlBuilder::new("Subscription");
        xml.element("Endpoint", &self.request.endpoint);
        xml.element_opt("NotifyStrategy", &self.request.notify_strategy);

        Ok(WireRequest::new(
            HttpMethod::Put,
            subscription_resource(self.topic, &self.request.subscription_name),
        )
        .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(SubscribeResponse {
            status: response.status,
            subscription_url: response.header("location").unwrap_or_default().to_string(),
        })
    }
}

pub(crate) struct Unsubscribe<'a> {
    pub topic: &'a TopicName,
    pub subscription_name: &'a str,
}

impl Operation for Unsubscribe<'_> {
    type Response = UnsubscribeResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_resource_name("subscription_name", self.subscription_name)?;
        Ok(WireRequest::new(
            HttpMethod::Delete,
            subscription_resource(self.topic, self.subscription_name),
        ))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(UnsubscribeResponse {
            status: response.status,
        })
    }
}

pub(crate) struct GetSubscriptionAttributes<'a> {
    pub topic: &'a TopicName,
    pub subscription_name: &'a str,
}

impl Operation for GetSubscriptionAttributes<'_> {
    type Response = GetSubscriptionAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_resource_name("subscription_name", self.subscription_name)?;
        Ok(WireRequest::new(
            HttpMethod::Get,
            subscription_resource(self.topic, self.subscription_name),
        ))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        let notify_strategy = fields
            .get("NotifyStrategy")
            .map(|s| {
                s.parse::<NotifyStrategy>()
                    .map_err(|_| Error::malformed(format!("unknown notify strategy '{}'", s)))
            })
            .transpose()?;

        Ok(GetSubscriptionAttributesResponse {
            status: response.status,
            attributes: SubscriptionAttributes {
                endpoint: fields.get("Endpoint").cloned(),
                notify_strategy,
                topic_name: fields.get("TopicName").cloned(),
                topic_owner: fields.get("TopicOwner").cloned(),
                create_time: optional_timestamp(&fields, "CreateTime")?,
                last_modify_time: optional_timestamp(&fields, "LastModifyTime")?,
            },
        })
    }
}

pub(crate) struct SetSubscriptionAttributes<'a> {
    pub topic: &'a TopicName,
    pub request: &'a SetSubscriptionAttributesRequest,
}

impl Operation for SetSubscriptionAttributes<'_> {
    type Response = SetSubscriptionAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_resource_name("subscription_name", &self.request.subscription_name)?;

        let mut xml = XmlBuilder::new("Subscription");
        xml.element("NotifyStrategy", self.request.notify_strategy.as_str());

        Ok(WireRequest::new(
            HttpMethod::Put,
            subscription_resource(self.topic, &self.request.subscription_name),
        )
        .with_parameter(PARAM_META_OVERRIDE, "true")
        .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(SetSubscriptionAttributesResponse {
            status: response.status,
        })
    }
}

pub(crate) struct ListSubscription<'a> {
    pub topic: &'a TopicName,
    pub request: &'a ListSubscriptionRequest,
}

impl Operation for ListSubscription<'_> {
    type Response = ListSubscriptionResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        validate_max_returns(self.request.max_returns)?;

        let mut request = WireRequest::new(
            HttpMethod::Get,
            format!("{}/subscriptions", topic_resource(self.topic)),
        );
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
        let doc = xml::parse_grouped(&response.body_text(), "Subscription")?;
        let subscription_urls = doc
            .items
            .iter()
            .filter_map(|item| item.get("SubscriptionURL").cloned())
            .collect();

        Ok(ListSubscriptionResponse {
            status: response.status,
            subscription_urls,
            next_marker: doc.fields.get("NextMarker").cloned().filter(|m| !m.is_empty()),
        })
    }
}

pub(crate) struct PublishMessage<'a> {
    pub topic: &'a TopicName,
    pub request: &'a PublishMessageRequest,
}

impl Operation for PublishMessage<'_> {
    type Response = PublishMessageResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        if self.request.message_body.is_empty() {
            return Err(ValidationError::Required {
                field: "message_body".to_string(),
            });
        }

        let mut xml = XmlBuilder::new("Message");
        xml.element("MessageBody", &self.request.message_body);

        Ok(WireRequest::new(
            HttpMethod::Put,
            format!("{}/messages", topic_resource(self.topic)),
        )
        .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(PublishMessageResponse {
            status: response.status,
            message_id: MessageId::from(super::required_field(&fields, "MessageId")?),
            message_body_md5: fields.get("MessageBodyMD5").cloned().unwrap_or_default(),
        })
    }
}
