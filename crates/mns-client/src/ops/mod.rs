//! Request and response types together with their wire transformations.
//!
//! Each operation pairs a typed request with a marshaller producing a
//! [`WireRequest`] and an unmarshaller consuming a [`WireResponse`]. The
//! error path is shared: every non-2xx response is parsed as the generic
//! `{Code, Message, RequestId, HostId}` envelope and mapped through the
//! fixed error-code table, unless an operation overrides it (batch delete).

pub mod account;
pub mod messages;
pub mod queues;
pub mod topics;

use crate::error::{Error, ErrorInfo, ValidationError};
use crate::types::{QueueName, Timestamp, TopicName};
use crate::wire::{WireRequest, WireResponse};
use crate::xml;
use std::collections::HashMap;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// ============================================================================
// Wire Constants
// ============================================================================

pub(crate) const PARAM_WAIT_SECONDS: &str = "waitseconds";
pub(crate) const PARAM_BATCH_SIZE: &str = "numOfMessages";
pub(crate) const PARAM_PEEK_ONLY: &str = "peekonly";
pub(crate) const PARAM_RECEIPT_HANDLE: &str = "ReceiptHandle";
pub(crate) const PARAM_VISIBILITY_TIMEOUT: &str = "VisibilityTimeout";
pub(crate) const PARAM_META_OVERRIDE: &str = "metaoverride";
pub(crate) const PARAM_ACCOUNT_META: &str = "accountmeta";
pub(crate) const PARAM_PREFIX: &str = "prefix";
pub(crate) const PARAM_MARKER: &str = "marker";
pub(crate) const PARAM_MAX_RETURNS: &str = "number";

/// Largest entry count the service accepts for any batch operation.
pub(crate) const MAX_BATCH_SIZE: u32 = 16;

/// Largest long-poll wait the service accepts, in seconds.
pub(crate) const MAX_WAIT_SECONDS: u32 = 30;

pub(crate) fn queue_resource(queue: &QueueName) -> String {
    format!("/queues/{}", queue)
}

pub(crate) fn message_resource(queue: &QueueName) -> String {
    format!("/queues/{}/messages", queue)
}

pub(crate) fn topic_resource(topic: &TopicName) -> String {
    format!("/topics/{}", topic)
}

pub(crate) fn subscription_resource(topic: &TopicName, subscription: &str) -> String {
    format!("/topics/{}/subscriptions/{}", topic, subscription)
}

// ============================================================================
// Operation Contract
// ============================================================================

/// One logical service operation: a marshaller for the request side and an
/// unmarshaller for each response side.
///
/// `marshall` is deterministic and does no I/O; malformed caller input fails
/// here and nowhere else. `unmarshall` consumes a 2xx response,
/// `unmarshall_error` everything else.
pub(crate) trait Operation {
    type Response;

    fn marshall(&self) -> Result<WireRequest, ValidationError>;

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error>;

    fn unmarshall_error(&self, response: &WireResponse) -> Error {
        unmarshall_error_envelope(response)
    }
}

/// Parse a non-2xx response body as the generic error envelope and map its
/// code through the error-code table.
///
/// An unparseable error body still yields a generic service error carrying
/// the status and a body excerpt, never a panic or an unrelated error.
pub(crate) fn unmarshall_error_envelope(response: &WireResponse) -> Error {
    let text = response.body_text();
    let info = match xml::parse_flat(&text) {
        Ok(fields) => ErrorInfo {
            code: fields.get("Code").cloned().unwrap_or_default(),
            message: fields.get("Message").cloned().unwrap_or_default(),
            request_id: fields.get("RequestId").cloned().unwrap_or_default(),
            host_id: fields.get("HostId").cloned().unwrap_or_default(),
            status: response.status,
        },
        Err(_) => ErrorInfo {
            message: text.chars().take(256).collect(),
            status: response.status,
            ..ErrorInfo::default()
        },
    };
    Error::from_error_info(info)
}

// ============================================================================
// Field Parsing Helpers
// ============================================================================

pub(crate) fn required_field(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<String, Error> {
    fields
        .get(name)
        .cloned()
        .ok_or_else(|| Error::malformed(format!("missing {} element in response", name)))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, Error> {
    let seconds: i64 = value
        .parse()
        .map_err(|_| Error::malformed(format!("invalid timestamp '{}'", value)))?;
    Timestamp::from_epoch_seconds(seconds)
        .map_err(|_| Error::malformed(format!("timestamp '{}' out of range", value)))
}

pub(crate) fn optional_timestamp(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<Option<Timestamp>, Error> {
    fields.get(name).map(|v| parse_timestamp(v)).transpose()
}

pub(crate) fn optional_u32(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<Option<u32>, Error> {
    fields
        .get(name)
        .map(|v| {
            v.parse()
                .map_err(|_| Error::malformed(format!("invalid {} value '{}'", name, v)))
        })
        .transpose()
}

pub(crate) fn optional_u64(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<Option<u64>, Error> {
    fields
        .get(name)
        .map(|v| {
            v.parse()
                .map_err(|_| Error::malformed(format!("invalid {} value '{}'", name, v)))
        })
        .transpose()
}

/// Trailing path segment of a resource URL, used to recover the resource
/// name from a `Location` header.
pub(crate) fn trailing_segment(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

// ============================================================================
// Validation Helpers
// ============================================================================

pub(crate) fn validate_batch_size(field: &str, size: u32) -> Result<(), ValidationError> {
    if size == 0 || size > MAX_BATCH_SIZE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            message: format!("must be 1-{}", MAX_BATCH_SIZE),
        });
    }
    Ok(())
}

pub(crate) fn validate_wait_seconds(wait_seconds: Option<u32>) -> Result<(), ValidationError> {
    if let Some(seconds) = wait_seconds {
        if seconds > MAX_WAIT_SECONDS {
            return Err(ValidationError::OutOfRange {
                field: "wait_seconds".to_string(),
                message: format!("must be 0-{}", MAX_WAIT_SECONDS),
            });
        }
    }
    Ok(())
}

pub(crate) fn validate_max_returns(max_returns: Option<u32>) -> Result<(), ValidationError> {
    if let Some(number) = max_returns {
        if number == 0 || number > 1000 {
            return Err(ValidationError::OutOfRange {
                field: "max_returns".to_string(),
                message: "must be 1-1000".to_string(),
            });
        }
    }
    Ok(())
}
