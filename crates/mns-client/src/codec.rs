//! Message body transcoding between logical text and the wire encoding.
//!
//! Bodies travel on the wire as base64 over the UTF-8 bytes of the logical
//! text. Send-side facades encode before marshalling; receive and peek
//! facades decode after unmarshalling.

use crate::error::Error;
use base64::{engine::general_purpose::STANDARD, Engine};

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

/// Encode a logical message body for the wire (UTF-8 then base64)
pub(crate) fn encode_body(body: &str) -> String {
    STANDARD.encode(body.as_bytes())
}

/// Decode a wire message body back to logical text.
///
/// A body that is not valid base64, or whose decoded bytes are not valid
/// UTF-8, is a protocol violation and reported as a generic service error.
pub(crate) fn decode_body(encoded: &str) -> Result<String, Error> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::malformed(format!("message body is not valid base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::malformed(format!("message body is not valid UTF-8: {}", e)))
}
