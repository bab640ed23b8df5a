//! XML reading and writing helpers for the MNS wire protocol.
//!
//! Request bodies are small flat documents, response bodies are either flat
//! documents or a single level of repeated item elements. The reader is a
//! pull parser in the same style the service responses are shaped: one pass,
//! collecting leaf text by element name.

use crate::error::Error;
use bytes::Bytes;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

#[cfg(test)]
#[path = "xml_tests.rs"]
mod tests;

/// Namespace carried by every request and response document.
pub(crate) const MNS_XML_NAMESPACE: &str = "http://mns.aliyuncs.com/doc/v1/";

// ============================================================================
// Writing
// ============================================================================

/// Incremental writer for the protocol's XML request bodies.
pub(crate) struct XmlBuilder {
    buf: String,
    root: &'static str,
}

impl XmlBuilder {
    /// Start a document with the given root element and the MNS namespace
    pub fn new(root: &'static str) -> Self {
        let mut buf = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        buf.push('<');
        buf.push_str(root);
        buf.push_str(" xmlns=\"");
        buf.push_str(MNS_XML_NAMESPACE);
        buf.push_str("\">");
        Self { buf, root }
    }

    /// Write a leaf element with escaped text content
    pub fn element(&mut self, name: &str, value: &str) {
        self.buf.push('<');
        self.buf.push_str(name);
        self.buf.push('>');
        self.buf.push_str(&escape(value));
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Write a leaf element only when the value is set
    pub fn element_opt<T: ToString>(&mut self, name: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.element(name, &value.to_string());
        }
    }

    /// Open a nested element
    pub fn open(&mut self, name: &str) {
        self.buf.push('<');
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Close a nested element
    pub fn close(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Close the root element and return the document bytes
    pub fn finish(mut self) -> Bytes {
        self.buf.push_str("</");
        self.buf.push_str(self.root);
        self.buf.push('>');
        Bytes::from(self.buf)
    }
}

// ============================================================================
// Reading
// ============================================================================

/// A parsed response document: repeated item elements plus the remaining
/// leaf fields directly under the root.
#[derive(Debug, Default)]
pub(crate) struct ParsedDoc {
    pub items: Vec<HashMap<String, String>>,
    pub fields: HashMap<String, String>,
}

/// Parse a document whose root holds repeated `item_element` children (each
/// flat) alongside plain leaf fields, e.g. `<Queues><Queue>...</Queue>
/// <NextMarker>...</NextMarker></Queues>`.
pub(crate) fn parse_grouped(xml: &str, item_element: &str) -> Result<ParsedDoc, Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut doc = ParsedDoc::default();
    let mut current_item: Option<HashMap<String, String>> = None;
    let mut current_leaf: Option<String> = None;
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if depth == 1 && name == item_element && current_item.is_none() {
                    current_item = Some(HashMap::new());
                } else if depth >= 1 {
                    current_leaf = Some(name);
                }
                depth += 1;
            }
            Ok(Event::Text(e)) => {
                if let Some(ref leaf) = current_leaf {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::malformed(format!("XML parsing error: {}", e)))?
                        .into_owned();
                    match current_item.as_mut() {
                        Some(item) => {
                            item.insert(leaf.clone(), text);
                        }
                        None => {
                            doc.fields.insert(leaf.clone(), text);
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                depth = depth.saturating_sub(1);
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if depth == 1 && name == item_element {
                    if let Some(item) = current_item.take() {
                        doc.items.push(item);
                    }
                }
                current_leaf = None;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::malformed(format!("XML parsing error: {}", e))),
        }
        buf.clear();
    }

    Ok(doc)
}

/// Parse a flat document into its leaf fields, e.g. the error envelope or an
/// attributes response.
pub(crate) fn parse_flat(xml: &str) -> Result<HashMap<String, String>, Error> {
    // No item element name ever matches, so everything lands in `fields`.
    parse_grouped(xml, "").map(|doc| doc.fields)
}
