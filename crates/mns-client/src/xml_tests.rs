//! Tests for the XML helpers.

use super::*;

mod builder_tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let mut xml = XmlBuilder::new("Queue");
        xml.element("VisibilityTimeout", "30");
        let body = String::from_utf8(xml.finish().to_vec()).expect("utf-8");

        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(body.contains(&format!("<Queue xmlns=\"{}\">", MNS_XML_NAMESPACE)));
        assert!(body.contains("<VisibilityTimeout>30</VisibilityTimeout>"));
        assert!(body.ends_with("</Queue>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut xml = XmlBuilder::new("Message");
        xml.element("MessageBody", "a<b & \"c\"");
        let body = String::from_utf8(xml.finish().to_vec()).expect("utf-8");

        assert!(body.contains("a&lt;b &amp;"));
        assert!(!body.contains("a<b"));
    }

    #[test]
    fn test_optional_elements_skipped_when_unset() {
        let mut xml = XmlBuilder::new("Message");
        xml.element_opt("DelaySeconds", &None::<u32>);
        xml.element_opt("Priority", &Some(8u32));
        let body = String::from_utf8(xml.finish().to_vec()).expect("utf-8");

        assert!(!body.contains("DelaySeconds"));
        assert!(body.contains("<Priority>8</Priority>"));
    }

    #[test]
    fn test_nested_elements() {
        let mut xml = XmlBuilder::new("Messages");
        xml.open("Message");
        xml.element("MessageBody", "one");
        xml.close("Message");
        xml.open("Message");
        xml.element("MessageBody", "two");
        xml.close("Message");
        let body = String::from_utf8(xml.finish().to_vec()).expect("utf-8");

        assert_eq!(body.matches("<Message>").count(), 2);
        assert!(body.contains("<MessageBody>one</MessageBody>"));
        assert!(body.contains("<MessageBody>two</MessageBody>"));
    }
}

mod parser_tests {
    use super::*;

    const ERROR_ENVELOPE: &str = r#"<?xml version="1.0"?>
        <Error xmlns="http://mns.aliyuncs.com/doc/v1/">
            <Code>QueueNotExist</Code>
            <Message>The queue name you provided does not exist.</Message>
            <RequestId>8B9DBF26-FAC4</RequestId>
            <HostId>account.mns.region.example.com</HostId>
        </Error>"#;

    #[test]
    fn test_parse_flat_envelope() {
        let fields = parse_flat(ERROR_ENVELOPE).expect("parse should succeed");

        assert_eq!(fields.get("Code").map(String::as_str), Some("QueueNotExist"));
        assert_eq!(
            fields.get("RequestId").map(String::as_str),
            Some("8B9DBF26-FAC4")
        );
        assert_eq!(
            fields.get("HostId").map(String::as_str),
            Some("account.mns.region.example.com")
        );
    }

    #[test]
    fn test_parse_grouped_items_and_fields() {
        let xml = r#"<Queues xmlns="http://mns.aliyuncs.com/doc/v1/">
            <Queue><QueueURL>http://host/queues/one</QueueURL></Queue>
            <Queue><QueueURL>http://host/queues/two</QueueURL></Queue>
            <NextMarker>marker-1</NextMarker>
        </Queues>"#;

        let doc = parse_grouped(xml, "Queue").expect("parse should succeed");

        assert_eq!(doc.items.len(), 2);
        assert_eq!(
            doc.items[0].get("QueueURL").map(String::as_str),
            Some("http://host/queues/one")
        );
        assert_eq!(
            doc.fields.get("NextMarker").map(String::as_str),
            Some("marker-1")
        );
    }

    #[test]
    fn test_parse_grouped_with_multiple_item_fields() {
        let xml = r#"<Messages xmlns="http://mns.aliyuncs.com/doc/v1/">
            <Message>
                <MessageId>id-1</MessageId>
                <MessageBody>aGVsbG8=</MessageBody>
            </Message>
        </Messages>"#;

        let doc = parse_grouped(xml, "Message").expect("parse should succeed");

        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.items[0].get("MessageId").map(String::as_str), Some("id-1"));
        assert_eq!(
            doc.items[0].get("MessageBody").map(String::as_str),
            Some("aGVsbG8=")
        );
    }

    #[test]
    fn test_parse_unescapes_text() {
        let xml = r#"<Error><Message>a&lt;b&amp;c</Message></Error>"#;
        let fields = parse_flat(xml).expect("parse should succeed");

        assert_eq!(fields.get("Message").map(String::as_str), Some("a<b&c"));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let result = parse_flat("<Error><Code>oops</Error>");
        assert!(result.is_err(), "mismatched tags should fail parsing");
    }

    #[test]
    fn test_root_is_not_an_item() {
        // A plain envelope whose root happens to share the item name must
        // not produce any items.
        let doc = parse_grouped(ERROR_ENVELOPE, "Error").expect("parse should succeed");

        assert!(doc.items.is_empty());
        assert_eq!(doc.fields.get("Code").map(String::as_str), Some("QueueNotExist"));
    }
}
