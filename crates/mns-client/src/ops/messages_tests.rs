//! Tests for message operation transformations.

use super::*;
use crate::error::code;
use crate::wire::HttpMethod;
use bytes::Bytes;

fn queue() -> QueueName {
    QueueName::new("demo").expect("valid name")
}

fn body_string(request: &WireRequest) -> String {
    String::from_utf8(request.body.clone().expect("body present").to_vec()).expect("utf-8")
}

// ============================================================================
// Send
// ============================================================================

mod send_tests {
    use super::*;

    #[test]
    fn test_marshall_shape() {
        let queue = queue();
        let request = SendMessageRequest::new("aGVsbG8=");
        let wire = SendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Put);
        assert_eq!(wire.resource_path, "/queues/demo/messages");
        let body = body_string(&wire);
        assert!(body.contains("<MessageBody>aGVsbG8=</MessageBody>"));
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let queue = queue();
        let request = SendMessageRequest::new("aGVsbG8=");
        let wire = SendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        let body = body_string(&wire);
        assert!(!body.contains("DelaySeconds"), "absent delay must not serialize");
        assert!(!body.contains("Priority"), "absent priority must not serialize");
    }

    #[test]
    fn test_set_fields_are_serialized() {
        let queue = queue();
        let request = SendMessageRequest::new("aGVsbG8=")
            .with_delay_seconds(60)
            .with_priority(8);
        let wire = SendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        let body = body_string(&wire);
        assert!(body.contains("<DelaySeconds>60</DelaySeconds>"));
        assert!(body.contains("<Priority>8</Priority>"));
    }

    #[test]
    fn test_empty_body_rejected() {
        let queue = queue();
        let request = SendMessageRequest::new("");
        let result = SendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall();

        assert!(result.is_err());
    }

    #[test]
    fn test_priority_out_of_range_rejected() {
        let queue = queue();
        for priority in [0, 17] {
            let request = SendMessageRequest::new("aGVsbG8=").with_priority(priority);
            let result = SendMessage {
                queue: &queue,
                request: &request,
            }
            .marshall();
            assert!(result.is_err(), "priority {} should be rejected", priority);
        }
    }

    #[test]
    fn test_unmarshall_response() {
        let queue = queue();
        let request = SendMessageRequest::new("aGVsbG8=");
        let response = WireResponse::new(
            201,
            Bytes::from(
                "<Message xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <MessageId>msg-1</MessageId>\
                 <MessageBodyMD5>F1E</MessageBodyMD5></Message>",
            ),
        );

        let parsed = SendMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .expect("unmarshall should succeed");

        assert_eq!(parsed.status, 201);
        assert_eq!(parsed.message_id.as_str(), "msg-1");
        assert_eq!(parsed.message_body_md5, "F1E");
    }
}

mod batch_send_tests {
    use super::*;

    #[test]
    fn test_marshall_repeats_message_elements() {
        let queue = queue();
        let request = BatchSendMessageRequest::new(vec![
            SendMessageRequest::new("b25l"),
            SendMessageRequest::new("dHdv").with_priority(1),
        ]);
        let wire = BatchSendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        let body = body_string(&wire);
        assert!(body.contains("<Messages xmlns="));
        assert_eq!(body.matches("<Message>").count(), 2);
        assert!(body.contains("<MessageBody>b25l</MessageBody>"));
        assert!(body.contains("<MessageBody>dHdv</MessageBody>"));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let queue = queue();
        let request = BatchSendMessageRequest::new(vec![]);
        assert!(BatchSendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_oversized_batch_rejected() {
        let queue = queue();
        let entries = (0..17).map(|_| SendMessageRequest::new("eA==")).collect();
        let request = BatchSendMessageRequest::new(entries);
        assert!(BatchSendMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_unmarshall_receipts() {
        let queue = queue();
        let request = BatchSendMessageRequest::new(vec![SendMessageRequest::new("eA==")]);
        let response = WireResponse::new(
            201,
            Bytes::from(
                "<Messages xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <Message><MessageId>m1</MessageId><MessageBodyMD5>A</MessageBodyMD5></Message>\
                 <Message><MessageId>m2</MessageId><MessageBodyMD5>B</MessageBodyMD5></Message>\
                 </Messages>",
            ),
        );

        let parsed = BatchSendMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .expect("unmarshall should succeed");

        assert_eq!(parsed.receipts.len(), 2);
        assert_eq!(parsed.receipts[0].message_id.as_str(), "m1");
        assert_eq!(parsed.receipts[1].message_id.as_str(), "m2");
    }
}

// ============================================================================
// Receive and Peek
// ============================================================================

mod receive_tests {
    use super::*;

    const RECEIVE_BODY: &str = "<Message xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
        <MessageId>msg-1</MessageId>\
        <ReceiptHandle>handle-1</ReceiptHandle>\
        <MessageBody>aGVsbG8=</MessageBody>\
        <MessageBodyMD5>F1E</MessageBodyMD5>\
        <EnqueueTime>1250700979</EnqueueTime>\
        <NextVisibleTime>1250700799</NextVisibleTime>\
        <FirstDequeueTime>1250700779</FirstDequeueTime>\
        <DequeueCount>3</DequeueCount>\
        <Priority>8</Priority></Message>";

    #[test]
    fn test_marshall_without_wait_seconds() {
        let queue = queue();
        let request = ReceiveMessageRequest::new();
        let wire = ReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Get);
        assert_eq!(wire.resource_path, "/queues/demo/messages");
        assert!(
            !wire.parameters.contains_key("waitseconds"),
            "absent wait must not serialize a default"
        );
    }

    #[test]
    fn test_marshall_with_wait_seconds() {
        let queue = queue();
        let request = ReceiveMessageRequest::new().with_wait_seconds(20);
        let wire = ReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.parameters.get("waitseconds").map(String::as_str), Some("20"));
    }

    #[test]
    fn test_wait_seconds_out_of_range_rejected() {
        let queue = queue();
        let request = ReceiveMessageRequest::new().with_wait_seconds(31);
        assert!(ReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_unmarshall_full_message() {
        let queue = queue();
        let request = ReceiveMessageRequest::new();
        let response = WireResponse::new(200, Bytes::from(RECEIVE_BODY));

        let parsed = ReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .expect("unmarshall should succeed");

        let message = parsed.message;
        assert_eq!(message.id.as_str(), "msg-1");
        assert_eq!(
            message.receipt_handle.as_ref().map(|h| h.as_str()),
            Some("handle-1")
        );
        assert_eq!(message.body, "aGVsbG8=", "body stays encoded until the facade");
        assert_eq!(
            message.enqueue_time.map(|t| t.epoch_seconds()),
            Some(1_250_700_979)
        );
        assert_eq!(
            message.next_visible_time.map(|t| t.epoch_seconds()),
            Some(1_250_700_799)
        );
        assert_eq!(
            message.first_dequeue_time.map(|t| t.epoch_seconds()),
            Some(1_250_700_779)
        );
        assert_eq!(message.dequeue_count, Some(3));
        assert_eq!(message.priority, Some(8));
    }

    #[test]
    fn test_unmarshall_rejects_missing_message_id() {
        let queue = queue();
        let request = ReceiveMessageRequest::new();
        let response = WireResponse::new(
            200,
            Bytes::from("<Message><MessageBody>aGVsbG8=</MessageBody></Message>"),
        );

        assert!(ReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .is_err());
    }

    #[test]
    fn test_batch_receive_marshall() {
        let queue = queue();
        let request = BatchReceiveMessageRequest::new(8).with_wait_seconds(10);
        let wire = BatchReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.parameters.get("numOfMessages").map(String::as_str), Some("8"));
        assert_eq!(wire.parameters.get("waitseconds").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_batch_receive_zero_size_rejected() {
        let queue = queue();
        let request = BatchReceiveMessageRequest::new(0);
        assert!(BatchReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_batch_receive_unmarshall() {
        let queue = queue();
        let request = BatchReceiveMessageRequest::new(2);
        let response = WireResponse::new(
            200,
            Bytes::from(
                "<Messages xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <Message><MessageId>m1</MessageId><ReceiptHandle>h1</ReceiptHandle>\
                 <MessageBody>b25l</MessageBody></Message>\
                 <Message><MessageId>m2</MessageId><ReceiptHandle>h2</ReceiptHandle>\
                 <MessageBody>dHdv</MessageBody></Message></Messages>",
            ),
        );

        let parsed = BatchReceiveMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .expect("unmarshall should succeed");

        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.messages[0].id.as_str(), "m1");
        assert_eq!(parsed.messages[1].id.as_str(), "m2");
    }

    #[test]
    fn test_peek_marshall_sets_peek_only() {
        let queue = queue();
        let wire = PeekMessage { queue: &queue }
            .marshall()
            .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Get);
        assert_eq!(wire.parameters.get("peekonly").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_batch_peek_marshall() {
        let queue = queue();
        let request = BatchPeekMessageRequest::new(4);
        let wire = BatchPeekMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.parameters.get("peekonly").map(String::as_str), Some("true"));
        assert_eq!(wire.parameters.get("numOfMessages").map(String::as_str), Some("4"));
    }
}

// ============================================================================
// Delete and Visibility
// ============================================================================

mod delete_tests {
    use super::*;

    #[test]
    fn test_delete_marshall() {
        let queue = queue();
        let request = DeleteMessageRequest::new(ReceiptHandle::from("handle-1".to_string()));
        let wire = DeleteMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Delete);
        assert_eq!(
            wire.parameters.get("ReceiptHandle").map(String::as_str),
            Some("handle-1")
        );
    }

    #[test]
    fn test_delete_empty_handle_rejected() {
        let queue = queue();
        let request = DeleteMessageRequest::new(ReceiptHandle::from(String::new()));
        assert!(DeleteMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_batch_delete_marshall() {
        let queue = queue();
        let request = BatchDeleteMessageRequest::new(vec![
            ReceiptHandle::from("h1".to_string()),
            ReceiptHandle::from("h2".to_string()),
        ]);
        let wire = BatchDeleteMessage {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Delete);
        let body = body_string(&wire);
        assert!(body.contains("<ReceiptHandle>h1</ReceiptHandle>"));
        assert!(body.contains("<ReceiptHandle>h2</ReceiptHandle>"));
    }

    #[test]
    fn test_batch_delete_partial_failure_enumerates_failed_handles() {
        let queue = queue();
        let request = BatchDeleteMessageRequest::new(vec![
            ReceiptHandle::from("h1".to_string()),
            ReceiptHandle::from("h2".to_string()),
            ReceiptHandle::from("h3".to_string()),
        ]);
        let response = WireResponse::new(
            404,
            Bytes::from(
                "<Errors xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <Error><ErrorCode>ReceiptHandleError</ErrorCode>\
                 <ErrorMessage>expired</ErrorMessage>\
                 <ReceiptHandle>h2</ReceiptHandle></Error>\
                 <Error><ErrorCode>MessageNotExist</ErrorCode>\
                 <ErrorMessage>gone</ErrorMessage>\
                 <ReceiptHandle>h3</ReceiptHandle></Error></Errors>",
            ),
        )
        .with_header("x-mns-request-id", "req-7");

        let error = BatchDeleteMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall_error(&response);

        match error {
            Error::BatchDeletePartialFailure { items, request_id } => {
                assert_eq!(items.len(), 2, "exactly the failing handles are listed");
                assert_eq!(items[0].receipt_handle, "h2");
                assert_eq!(items[0].code, code::RECEIPT_HANDLE_ERROR);
                assert_eq!(items[0].message, "expired");
                assert_eq!(items[1].receipt_handle, "h3");
                assert_eq!(items[1].code, code::MESSAGE_NOT_EXIST);
                assert_eq!(request_id, "req-7");
            }
            other => panic!("expected BatchDeletePartialFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_delete_plain_envelope_still_maps() {
        let queue = queue();
        let request = BatchDeleteMessageRequest::new(vec![ReceiptHandle::from("h1".to_string())]);
        let response = WireResponse::new(
            404,
            Bytes::from(
                "<Error xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <Code>QueueNotExist</Code><Message>gone</Message>\
                 <RequestId>r</RequestId><HostId>h</HostId></Error>",
            ),
        );

        let error = BatchDeleteMessage {
            queue: &queue,
            request: &request,
        }
        .unmarshall_error(&response);

        assert!(matches!(error, Error::QueueNotFound(_)));
    }
}

mod visibility_tests {
    use super::*;

    #[test]
    fn test_marshall_parameters() {
        let queue = queue();
        let request =
            ChangeMessageVisibilityRequest::new(ReceiptHandle::from("handle-1".to_string()), 60);
        let wire = ChangeMessageVisibility {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .expect("marshall should succeed");

        assert_eq!(wire.method, HttpMethod::Put);
        assert_eq!(
            wire.parameters.get("ReceiptHandle").map(String::as_str),
            Some("handle-1")
        );
        assert_eq!(
            wire.parameters.get("VisibilityTimeout").map(String::as_str),
            Some("60")
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let queue = queue();
        let request =
            ChangeMessageVisibilityRequest::new(ReceiptHandle::from("handle-1".to_string()), 0);
        assert!(ChangeMessageVisibility {
            queue: &queue,
            request: &request,
        }
        .marshall()
        .is_err());
    }

    #[test]
    fn test_unmarshall_returns_replacement_handle() {
        let queue = queue();
        let request =
            ChangeMessageVisibilityRequest::new(ReceiptHandle::from("handle-1".to_string()), 60);
        let response = WireResponse::new(
            200,
            Bytes::from(
                "<ChangeVisibility xmlns=\"http://mns.aliyuncs.com/doc/v1/\">\
                 <ReceiptHandle>handle-2</ReceiptHandle>\
                 <NextVisibleTime>1250700999</NextVisibleTime></ChangeVisibility>",
            ),
        );

        let parsed = ChangeMessageVisibility {
            queue: &queue,
            request: &request,
        }
        .unmarshall(&response)
        .expect("unmarshall should succeed");

        assert_eq!(parsed.receipt_handle.as_str(), "handle-2");
        assert_eq!(parsed.next_visible_time.epoch_seconds(), 1_250_700_999);
    }
}
