//! # MNS Client
//!
//! Async client SDK for an MNS-style cloud message queue and topic service:
//! queue and topic lifecycle, single and batch send/receive/peek/delete,
//! visibility timeouts, pub/sub subscriptions, and account attributes over a
//! signed XML-over-HTTP wire protocol.
//!
//! This library provides:
//! - Typed request/response objects with deterministic marshalling
//! - An invocation pipeline with exactly one outcome per call
//! - A total error-code mapping into a typed error taxonomy
//! - Queue facades with existence-check-and-create and best-effort
//!   auto-delete of received messages
//!
//! ## Module Organization
//!
//! - [error] - Error taxonomy and the wire error-code table
//! - [types] - Resource names, messages, attribute bags
//! - [wire] - Generic wire request/response types
//! - [ops] - Per-operation request/response types and transformations
//! - [signer] - Credentials and request signing
//! - [transport] - HTTP transport boundary
//! - [pipeline] - Client configuration and the invocation pipeline
//! - [queue] / [topic] - Resource facades
//! - [client] - Top-level client and facade factory

// Module declarations
pub mod client;
mod codec;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod queue;
pub mod signer;
pub mod topic;
pub mod transport;
pub mod types;
pub mod wire;
mod xml;

// Re-export commonly used types at crate root for convenience
pub use client::{MnsClient, MnsClientBuilder};
pub use error::{
    BatchErrorItem, Error, ErrorInfo, SignError, TransportError, ValidationError,
};
pub use ops::account::{GetAccountAttributesResponse, SetAccountAttributesResponse};
pub use ops::messages::{
    BatchDeleteMessageRequest, BatchDeleteMessageResponse, BatchPeekMessageRequest,
    BatchPeekMessageResponse, BatchReceiveMessageRequest, BatchReceiveMessageResponse,
    BatchSendMessageRequest, BatchSendMessageResponse, ChangeMessageVisibilityRequest,
    ChangeMessageVisibilityResponse, DeleteMessageRequest, DeleteMessageResponse,
    PeekMessageResponse, ReceiveMessageRequest, ReceiveMessageResponse, SendMessageRequest,
    SendMessageResponse, SendReceipt,
};
pub use ops::queues::{
    CreateQueueRequest, CreateQueueResponse, DeleteQueueResponse, GetQueueAttributesResponse,
    ListQueueRequest, ListQueueResponse, SetQueueAttributesResponse,
};
pub use ops::topics::{
    CreateTopicRequest, CreateTopicResponse, DeleteTopicResponse,
    GetSubscriptionAttributesResponse, GetTopicAttributesResponse, ListSubscriptionRequest,
    ListSubscriptionResponse, ListTopicRequest, ListTopicResponse, PublishMessageRequest,
    PublishMessageResponse, SetSubscriptionAttributesRequest, SetSubscriptionAttributesResponse,
    SetTopicAttributesResponse, SubscribeRequest, SubscribeResponse, UnsubscribeResponse,
};
pub use pipeline::ClientConfig;
pub use queue::{DeleteFailureCallback, Queue};
pub use signer::{Credentials, MnsSigner, RequestSigner};
pub use topic::Topic;
pub use transport::{HttpTransport, Transport};
pub use types::{
    AccountAttributes, Message, MessageId, NotifyStrategy, QueueAttributes, QueueName,
    ReceiptHandle, SubscriptionAttributes, Timestamp, TopicAttributes, TopicName,
};
pub use wire::{HttpMethod, WireRequest, WireResponse};
