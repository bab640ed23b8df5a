//! Error types for MNS service operations.

use thiserror::Error;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

/// Wire-level error codes returned by the service.
pub mod code {
    pub const QUEUE_NOT_EXIST: &str = "QueueNotExist";
    pub const QUEUE_ALREADY_EXIST: &str = "QueueAlreadyExist";
    pub const TOPIC_NOT_EXIST: &str = "TopicNotExist";
    pub const TOPIC_ALREADY_EXIST: &str = "TopicAlreadyExist";
    pub const INVALID_ARGUMENT: &str = "InvalidArgument";
    pub const RECEIPT_HANDLE_ERROR: &str = "ReceiptHandleError";
    pub const MESSAGE_NOT_EXIST: &str = "MessageNotExist";
    pub const SUBSCRIPTION_NOT_EXIST: &str = "SubscriptionNotExist";
    pub const SUBSCRIPTION_ALREADY_EXIST: &str = "SubscriptionAlreadyExist";

    /// Synthetic code for responses the client could not decode.
    pub const MALFORMED_RESPONSE: &str = "MalformedResponse";
}

/// Generic error envelope parsed from a service error body.
///
/// Every service-side failure retains this envelope in full so a caller can
/// file a support request against the service (code, message, request id,
/// host id, HTTP status).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub host_id: String,
    pub status: u16,
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (status {}, request {})",
            self.code, self.message, self.status, self.request_id
        )
    }
}

/// One failed entry of a batch delete operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchErrorItem {
    pub receipt_handle: String,
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for BatchErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.receipt_handle, self.code, self.message)
    }
}

/// Comprehensive error type for all MNS operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("queue not found: {0}")]
    QueueNotFound(ErrorInfo),

    #[error("queue already exists: {0}")]
    QueueAlreadyExists(ErrorInfo),

    #[error("topic not found: {0}")]
    TopicNotFound(ErrorInfo),

    #[error("topic already exists: {0}")]
    TopicAlreadyExists(ErrorInfo),

    #[error("invalid argument: {0}")]
    InvalidArgument(ErrorInfo),

    #[error("invalid or expired receipt handle: {0}")]
    ReceiptHandleInvalid(ErrorInfo),

    #[error("message not found: {0}")]
    MessageNotFound(ErrorInfo),

    #[error("subscription not found: {0}")]
    SubscriptionNotFound(ErrorInfo),

    #[error("subscription already exists: {0}")]
    SubscriptionAlreadyExists(ErrorInfo),

    #[error("batch delete failed for {} receipt handle(s)", .items.len())]
    BatchDeletePartialFailure {
        items: Vec<BatchErrorItem>,
        request_id: String,
    },

    #[error("service error: {0}")]
    Service(ErrorInfo),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("signing failed: {0}")]
    Sign(#[from] SignError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Map a parsed error envelope to its specific error kind.
    ///
    /// The mapping is total: every known code gets a dedicated variant and
    /// anything else falls through to [`Error::Service`] with the original
    /// envelope preserved.
    pub fn from_error_info(info: ErrorInfo) -> Self {
        match info.code.as_str() {
            code::QUEUE_NOT_EXIST => Self::QueueNotFound(info),
            code::QUEUE_ALREADY_EXIST => Self::QueueAlreadyExists(info),
            code::TOPIC_NOT_EXIST => Self::TopicNotFound(info),
            code::TOPIC_ALREADY_EXIST => Self::TopicAlreadyExists(info),
            code::INVALID_ARGUMENT => Self::InvalidArgument(info),
            code::RECEIPT_HANDLE_ERROR => Self::ReceiptHandleInvalid(info),
            code::MESSAGE_NOT_EXIST => Self::MessageNotFound(info),
            code::SUBSCRIPTION_NOT_EXIST => Self::SubscriptionNotFound(info),
            code::SUBSCRIPTION_ALREADY_EXIST => Self::SubscriptionAlreadyExists(info),
            _ => Self::Service(info),
        }
    }

    /// Build a generic service error for a response the client could not
    /// decode (bad base64, malformed XML, missing required elements).
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Service(ErrorInfo {
            code: code::MALFORMED_RESPONSE.to_string(),
            message: message.into(),
            ..ErrorInfo::default()
        })
    }

    /// Get the service error envelope, if this error carries one
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::QueueNotFound(info)
            | Self::QueueAlreadyExists(info)
            | Self::TopicNotFound(info)
            | Self::TopicAlreadyExists(info)
            | Self::InvalidArgument(info)
            | Self::ReceiptHandleInvalid(info)
            | Self::MessageNotFound(info)
            | Self::SubscriptionNotFound(info)
            | Self::SubscriptionAlreadyExists(info)
            | Self::Service(info) => Some(info),
            Self::BatchDeletePartialFailure { .. }
            | Self::Transport(_)
            | Self::Sign(_)
            | Self::Validation(_) => None,
        }
    }

    /// Check if the error is transient and a retry may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(transport) => transport.is_transient(),
            Self::Service(info) => info.status >= 500,
            _ => false,
        }
    }
}

/// Network-level failures raised before a service response was obtained
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("invalid endpoint: {message}")]
    InvalidEndpoint { message: String },
}

impl TransportError {
    /// Check if the failure is transient and a retry may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } => true,
            Self::Timeout { .. } => true,
            Self::InvalidResponse { .. } => false,
            Self::InvalidEndpoint { .. } => false,
        }
    }
}

/// Failures while computing the request signature
#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid signing key: {message}")]
    InvalidKey { message: String },
}

/// Caller input errors raised at marshalling time, before any I/O
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required field missing: {field}")]
    Required { field: String },

    #[error("invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}
