//! Tests for the error taxonomy and the code table.

use super::*;

fn info(error_code: &str) -> ErrorInfo {
    ErrorInfo {
        code: error_code.to_string(),
        message: "test message".to_string(),
        request_id: "req-1".to_string(),
        host_id: "host-1".to_string(),
        status: 400,
    }
}

#[test]
fn test_every_known_code_maps_to_its_kind() {
    let cases: Vec<(&str, fn(&Error) -> bool)> = vec![
        (code::QUEUE_NOT_EXIST, |e| matches!(e, Error::QueueNotFound(_))),
        (code::QUEUE_ALREADY_EXIST, |e| {
            matches!(e, Error::QueueAlreadyExists(_))
        }),
        (code::TOPIC_NOT_EXIST, |e| matches!(e, Error::TopicNotFound(_))),
        (code::TOPIC_ALREADY_EXIST, |e| {
            matches!(e, Error::TopicAlreadyExists(_))
        }),
        (code::INVALID_ARGUMENT, |e| {
            matches!(e, Error::InvalidArgument(_))
        }),
        (code::RECEIPT_HANDLE_ERROR, |e| {
            matches!(e, Error::ReceiptHandleInvalid(_))
        }),
        (code::MESSAGE_NOT_EXIST, |e| {
            matches!(e, Error::MessageNotFound(_))
        }),
        (code::SUBSCRIPTION_NOT_EXIST, |e| {
            matches!(e, Error::SubscriptionNotFound(_))
        }),
        (code::SUBSCRIPTION_ALREADY_EXIST, |e| {
            matches!(e, Error::SubscriptionAlreadyExists(_))
        }),
    ];

    for (error_code, matcher) in cases {
        let error = Error::from_error_info(info(error_code));
        assert!(matcher(&error), "code {} mapped to {:?}", error_code, error);
    }
}

#[test]
fn test_unknown_code_falls_through_to_service_error() {
    let error = Error::from_error_info(info("InternalServerError"));

    match error {
        Error::Service(info) => {
            assert_eq!(info.code, "InternalServerError");
            assert_eq!(info.message, "test message");
            assert_eq!(info.request_id, "req-1");
        }
        other => panic!("expected Service, got {:?}", other),
    }
}

#[test]
fn test_envelope_retained_on_every_service_kind() {
    let error = Error::from_error_info(info(code::QUEUE_NOT_EXIST));
    let envelope = error.error_info().expect("service kinds carry an envelope");

    assert_eq!(envelope.code, code::QUEUE_NOT_EXIST);
    assert_eq!(envelope.request_id, "req-1");
    assert_eq!(envelope.host_id, "host-1");
    assert_eq!(envelope.status, 400);
}

#[test]
fn test_transient_classification() {
    let timeout = Error::Transport(TransportError::Timeout {
        message: "deadline".to_string(),
    });
    assert!(timeout.is_transient());

    let connection = Error::Transport(TransportError::ConnectionFailed {
        message: "refused".to_string(),
    });
    assert!(connection.is_transient());

    let server_error = Error::from_error_info(ErrorInfo {
        status: 503,
        ..info("InternalError")
    });
    assert!(server_error.is_transient());

    let not_found = Error::from_error_info(info(code::QUEUE_NOT_EXIST));
    assert!(!not_found.is_transient());

    let validation = Error::Validation(ValidationError::Required {
        field: "queue_name".to_string(),
    });
    assert!(!validation.is_transient());
}

#[test]
fn test_batch_failure_display_reports_count() {
    let error = Error::BatchDeletePartialFailure {
        items: vec![
            BatchErrorItem {
                receipt_handle: "h1".to_string(),
                code: code::RECEIPT_HANDLE_ERROR.to_string(),
                message: "expired".to_string(),
            },
            BatchErrorItem {
                receipt_handle: "h2".to_string(),
                code: code::MESSAGE_NOT_EXIST.to_string(),
                message: "gone".to_string(),
            },
        ],
        request_id: "req-9".to_string(),
    };

    assert!(error.to_string().contains("2 receipt handle(s)"));
    assert!(error.error_info().is_none());
}

#[test]
fn test_malformed_helper_keeps_generic_kind() {
    let error = Error::malformed("body was not XML");

    match error {
        Error::Service(info) => {
            assert_eq!(info.code, code::MALFORMED_RESPONSE);
            assert_eq!(info.message, "body was not XML");
        }
        other => panic!("expected Service, got {:?}", other),
    }
}
