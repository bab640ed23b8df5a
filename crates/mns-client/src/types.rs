//! Domain value types: resource names, message structures, attribute bags.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

// ============================================================================
// Resource Names
// ============================================================================

pub(crate) fn validate_resource_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.len() > 256 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            message: "must be 1-256 characters".to_string(),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            message: "only ASCII alphanumeric characters and hyphens allowed".to_string(),
        });
    }

    if name.starts_with('-') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            message: "must not start with a hyphen".to_string(),
        });
    }

    Ok(())
}

/// Validated queue name with length and character restrictions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    /// Create new queue name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_resource_name("queue_name", &name)?;
        Ok(Self(name))
    }

    /// Get queue name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QueueName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Validated topic name with the same restrictions as queue names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicName(String);

impl TopicName {
    /// Create new topic name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_resource_name("topic_name", &name)?;
        Ok(Self(name))
    }

    /// Get topic name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Message Identifiers
// ============================================================================

/// Identifier assigned to a message by the service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Get message ID as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque single-use token issued with a received message.
///
/// A handle stays valid only until the next successful delete or visibility
/// change on its message, or until the message becomes visible again. Using a
/// stale handle is reported by the service as a dedicated error kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    /// Get the handle token as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ReceiptHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// UTC timestamp wrapper for consistent time handling.
///
/// Timestamps travel on the wire as integer seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Create timestamp from integer seconds since the Unix epoch
    pub fn from_epoch_seconds(seconds: i64) -> Result<Self, ValidationError> {
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "timestamp".to_string(),
                message: format!("{} is not a representable time", seconds),
            })
    }

    /// Get seconds since the Unix epoch
    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// ============================================================================
// Messages
// ============================================================================

/// A message returned by receive or peek operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Present on receive, absent on peek (peek does not consume)
    pub receipt_handle: Option<ReceiptHandle>,
    pub body: String,
    pub body_md5: String,
    pub enqueue_time: Option<Timestamp>,
    pub next_visible_time: Option<Timestamp>,
    pub first_dequeue_time: Option<Timestamp>,
    pub dequeue_count: Option<u32>,
    pub priority: Option<u32>,
}

// ============================================================================
// Attribute Bags
// ============================================================================

/// Queue attributes.
///
/// Writable fields are `Option`: an absent field is never serialized, so a
/// set-attributes call leaves the corresponding server-side value untouched.
/// The counters and timestamps are reported by the service and ignored on
/// writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueAttributes {
    pub visibility_timeout: Option<u32>,
    pub maximum_message_size: Option<u32>,
    pub message_retention_period: Option<u32>,
    pub delay_seconds: Option<u32>,
    pub polling_wait_seconds: Option<u32>,
    pub queue_name: Option<String>,
    pub create_time: Option<Timestamp>,
    pub last_modify_time: Option<Timestamp>,
    pub active_messages: Option<u64>,
    pub inactive_messages: Option<u64>,
    pub delay_messages: Option<u64>,
}

impl QueueAttributes {
    /// Create empty attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the visibility timeout in seconds
    pub fn with_visibility_timeout(mut self, seconds: u32) -> Self {
        self.visibility_timeout = Some(seconds);
        self
    }

    /// Set the maximum message size in bytes
    pub fn with_maximum_message_size(mut self, bytes: u32) -> Self {
        self.maximum_message_size = Some(bytes);
        self
    }

    /// Set the message retention period in seconds
    pub fn with_message_retention_period(mut self, seconds: u32) -> Self {
        self.message_retention_period = Some(seconds);
        self
    }

    /// Set the default delivery delay in seconds
    pub fn with_delay_seconds(mut self, seconds: u32) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }

    /// Set the default long-poll wait in seconds
    pub fn with_polling_wait_seconds(mut self, seconds: u32) -> Self {
        self.polling_wait_seconds = Some(seconds);
        self
    }
}

/// Topic attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicAttributes {
    pub maximum_message_size: Option<u32>,
    pub message_retention_period: Option<u32>,
    pub topic_name: Option<String>,
    pub create_time: Option<Timestamp>,
    pub last_modify_time: Option<Timestamp>,
}

impl TopicAttributes {
    /// Create empty attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum message size in bytes
    pub fn with_maximum_message_size(mut self, bytes: u32) -> Self {
        self.maximum_message_size = Some(bytes);
        self
    }

    /// Set the message retention period in seconds
    pub fn with_message_retention_period(mut self, seconds: u32) -> Self {
        self.message_retention_period = Some(seconds);
        self
    }
}

/// Retry strategy applied when pushing a topic message to a subscriber fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyStrategy {
    BackoffRetry,
    ExponentialDecayRetry,
}

impl NotifyStrategy {
    /// Get the strategy as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackoffRetry => "BACKOFF_RETRY",
            Self::ExponentialDecayRetry => "EXPONENTIAL_DECAY_RETRY",
        }
    }
}

impl std::fmt::Display for NotifyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotifyStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BACKOFF_RETRY" => Ok(Self::BackoffRetry),
            "EXPONENTIAL_DECAY_RETRY" => Ok(Self::ExponentialDecayRetry),
            other => Err(ValidationError::InvalidFormat {
                field: "notify_strategy".to_string(),
                message: format!("unknown strategy '{}'", other),
            }),
        }
    }
}

/// Subscription attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionAttributes {
    pub endpoint: Option<String>,
    pub notify_strategy: Option<NotifyStrategy>,
    pub topic_name: Option<String>,
    pub topic_owner: Option<String>,
    pub create_time: Option<Timestamp>,
    pub last_modify_time: Option<Timestamp>,
}

/// Account-level attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountAttributes {
    pub logging_bucket: Option<String>,
}

impl AccountAttributes {
    /// Create empty attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket that receives service access logs
    pub fn with_logging_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.logging_bucket = Some(bucket.into());
        self
    }
}
