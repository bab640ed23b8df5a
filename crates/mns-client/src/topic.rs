//! Topic facade binding a topic name to the invocation pipeline.

use crate::error::Error;
use crate::ops::topics::{
    GetSubscriptionAttributes, GetSubscriptionAttributesResponse, GetTopicAttributes,
    GetTopicAttributesResponse, ListSubscription, ListSubscriptionRequest,
    ListSubscriptionResponse, PublishMessage, PublishMessageRequest, PublishMessageResponse,
    SetSubscriptionAttributes, SetSubscriptionAttributesRequest,
    SetSubscriptionAttributesResponse, SetTopicAttributes, SetTopicAttributesResponse, Subscribe,
    SubscribeRequest, SubscribeResponse, Unsubscribe, UnsubscribeResponse,
};
use crate::pipeline::ServiceClient;
use crate::types::{TopicAttributes, TopicName};
use std::sync::Arc;

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;

/// Typed facade over one named topic.
///
/// Pure pass-through: every operation marshalls, invokes, and unmarshalls
/// with no extra processing.
pub struct Topic {
    name: TopicName,
    client: Arc<ServiceClient>,
}

impl Topic {
    pub(crate) fn new(name: TopicName, client: Arc<ServiceClient>) -> Self {
        Self { name, client }
    }

    /// Get the topic name
    pub fn name(&self) -> &TopicName {
        &self.name
    }

    /// Get the topic's attributes
    pub async fn get_attributes(&self) -> Result<GetTopicAttributesResponse, Error> {
        self.client
            .invoke(&GetTopicAttributes { topic: &self.name })
            .await
    }

    /// Overwrite the topic's writable attributes
    pub async fn set_attributes(
        &self,
        attributes: TopicAttributes,
    ) -> Result<SetTopicAttributesResponse, Error> {
        self.client
            .invoke(&SetTopicAttributes {
                topic: &self.name,
                attributes: &attributes,
            })
            .await
    }

    /// Subscribe an endpoint to this topic
    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<SubscribeResponse, Error> {
        self.client
            .invoke(&Subscribe {
                topic: &self.name,
                request: &request,
            })
            .await
    }

    /// Remove a subscription by name
    pub async fn unsubscribe(&self, subscription_name: &str) -> Result<UnsubscribeResponse, Error> {
        self.client
            .invoke(&Unsubscribe {
                topic: &self.name,
                subscription_name,
            })
            .await
    }

    /// Get a subscription's attributes
    pub async fn get_subscription_attributes(
        &self,
        subscription_name: &str,
    ) -> Result<GetSubscriptionAttributesResponse, Error> {
        self.client
            .invoke(&GetSubscriptionAttributes {
                topic: &self.name,
                subscription_name,
            })
            .await
    }

    /// Update a subscription's notify strategy
    pub async fn set_subscription_attributes(
        &self,
        request: SetSubscriptionAttributesRequest,
    ) -> Result<SetSubscriptionAttributesResponse, Error> {
        self.client
            .invoke(&SetSubscriptionAttributes {
                topic: &self.name,
                request: &request,
            })
            .await
    }

    /// List this topic's subscriptions, one page at a time
    pub async fn list_subscriptions(
        &self,
        request: ListSubscriptionRequest,
    ) -> Result<ListSubscriptionResponse, Error> {
        self.client
            .invoke(&ListSubscription {
                topic: &self.name,
                request: &request,
            })
            .await
    }

    /// Publish a message to every subscriber of this topic
    pub async fn publish_message(
        &self,
        request: PublishMessageRequest,
    ) -> Result<PublishMessageResponse, Error> {
        self.client
            .invoke(&PublishMessage {
                topic: &self.name,
                request: &request,
            })
            .await
    }
}

impl std::fmt::Debug for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic").field("name", &self.name).finish()
    }
}
