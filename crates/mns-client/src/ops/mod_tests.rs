//! Tests for the shared operation helpers.

use super::*;
use crate::error::code;
use bytes::Bytes;

fn error_response(status: u16, error_code: &str) -> WireResponse {
    let body = format!(
        "<?xml version=\"1.0\"?><Error xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
         <Code>{}</Code><Message>details</Message>\
         <RequestId>req-1</RequestId><HostId>host-1</HostId></Error>",
        error_code
    );
    WireResponse::new(status, Bytes::from(body))
}

mod envelope_tests {
    use super::*;

    #[test]
    fn test_known_code_maps_to_specific_kind() {
        let error = unmarshall_error_envelope(&error_response(404, code::QUEUE_NOT_EXIST));
        assert!(matches!(error, Error::QueueNotFound(_)));

        let error = unmarshall_error_envelope(&error_response(409, code::QUEUE_ALREADY_EXIST));
        assert!(matches!(error, Error::QueueAlreadyExists(_)));
    }

    #[test]
    fn test_unknown_code_preserves_envelope() {
        let error = unmarshall_error_envelope(&error_response(500, "SomeNewCode"));

        match error {
            Error::Service(info) => {
                assert_eq!(info.code, "SomeNewCode");
                assert_eq!(info.message, "details");
                assert_eq!(info.request_id, "req-1");
                assert_eq!(info.status, 500);
            }
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_body_still_yields_service_error() {
        let response = WireResponse::new(502, Bytes::from("<html>bad gateway"));
        let error = unmarshall_error_envelope(&response);

        match error {
            Error::Service(info) => assert_eq!(info.status, 502),
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_yields_service_error() {
        let error = unmarshall_error_envelope(&WireResponse::new(403, Bytes::new()));
        assert!(matches!(error, Error::Service(_)));
    }
}

mod helper_tests {
    use super::*;

    #[test]
    fn test_trailing_segment() {
        assert_eq!(
            trailing_segment("http://account.mns.region.example.com/queues/demo-queue"),
            "demo-queue"
        );
        assert_eq!(trailing_segment("http://host/queues/demo/"), "demo");
        assert_eq!(trailing_segment("plain"), "plain");
    }

    #[test]
    fn test_parse_timestamp() {
        let timestamp = parse_timestamp("1250700999").expect("valid epoch seconds");
        assert_eq!(timestamp.epoch_seconds(), 1_250_700_999);

        assert!(parse_timestamp("not-a-number").is_err());
    }

    #[test]
    fn test_resource_paths() {
        let queue = crate::types::QueueName::new("demo").expect("valid name");
        assert_eq!(queue_resource(&queue), "/queues/demo");
        assert_eq!(message_resource(&queue), "/queues/demo/messages");

        let topic = crate::types::TopicName::new("events").expect("valid name");
        assert_eq!(topic_resource(&topic), "/topics/events");
        assert_eq!(
            subscription_resource(&topic, "sub-1"),
            "/topics/events/subscriptions/sub-1"
        );
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_batch_size_bounds() {
        assert!(validate_batch_size("batch_size", 0).is_err());
        assert!(validate_batch_size("batch_size", 1).is_ok());
        assert!(validate_batch_size("batch_size", MAX_BATCH_SIZE).is_ok());
        assert!(validate_batch_size("batch_size", MAX_BATCH_SIZE + 1).is_err());
    }

    #[test]
    fn test_wait_seconds_bounds() {
        assert!(validate_wait_seconds(None).is_ok());
        assert!(validate_wait_seconds(Some(0)).is_ok());
        assert!(validate_wait_seconds(Some(MAX_WAIT_SECONDS)).is_ok());
        assert!(validate_wait_seconds(Some(MAX_WAIT_SECONDS + 1)).is_err());
    }

    #[test]
    fn test_max_returns_bounds() {
        assert!(validate_max_returns(None).is_ok());
        assert!(validate_max_returns(Some(1)).is_ok());
        assert!(validate_max_returns(Some(1000)).is_ok());
        assert!(validate_max_returns(Some(0)).is_err());
        assert!(validate_max_returns(Some(1001)).is_err());
    }
}
