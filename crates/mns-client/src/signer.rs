//! Request signing for MNS service authentication.

use crate::error::SignError;
use crate::wire::WireRequest;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;

#[cfg(test)]
#[path = "signer_tests.rs"]
mod tests;

/// Service API version sent with every request.
pub(crate) const SERVICE_VERSION: &str = "2015-06-06";

type HmacSha1 = Hmac<Sha1>;

/// Account credentials used to sign requests
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: Option<String>,
}

impl Credentials {
    /// Create credentials from an access key pair
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }

    /// Attach a short-lived STS security token
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

/// Interface for signing a wire request with account credentials.
///
/// The signing scheme itself is a collaborator: the pipeline only requires
/// that `sign` stamps whatever headers the service needs onto the request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &mut WireRequest, credentials: &Credentials) -> Result<(), SignError>;
}

/// Default MNS request signer.
///
/// Builds the canonical string
/// `VERB \n Content-MD5 \n Content-Type \n Date \n x-mns-headers resource`,
/// signs it with HMAC-SHA1 over the account secret, and emits
/// `Authorization: MNS <access-key-id>:<base64 signature>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MnsSigner;

impl MnsSigner {
    /// Create a new signer
    pub fn new() -> Self {
        Self
    }

    fn string_to_sign(request: &WireRequest) -> String {
        let content_md5 = request.header("content-md5").unwrap_or("");
        let content_type = request.header("content-type").unwrap_or("");
        let date = request.header("date").unwrap_or("");

        // Headers are already stored lowercase and sorted (BTreeMap), so the
        // canonicalized x-mns section falls out directly.
        let mut canonical = String::new();
        for (key, value) in &request.headers {
            if key.starts_with("x-mns-") {
                canonical.push_str(key);
                canonical.push(':');
                canonical.push_str(value);
                canonical.push('\n');
            }
        }

        format!(
            "{}\n{}\n{}\n{}\n{}{}",
            request.method.as_str(),
            content_md5,
            content_type,
            date,
            canonical,
            request.canonical_resource()
        )
    }
}

impl RequestSigner for MnsSigner {
    fn sign(&self, request: &mut WireRequest, credentials: &Credentials) -> Result<(), SignError> {
        if request.header("date").is_none() {
            let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            request.set_header("date", date);
        }
        request.set_header("x-mns-version", SERVICE_VERSION);
        if let Some(ref token) = credentials.security_token {
            request.set_header("security-token", token.clone());
        }

        let string_to_sign = Self::string_to_sign(request);

        let mut mac = HmacSha1::new_from_slice(credentials.access_key_secret.as_bytes())
            .map_err(|e| SignError::InvalidKey {
                message: e.to_string(),
            })?;
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        request.set_header(
            "authorization",
            format!("MNS {}:{}", credentials.access_key_id, signature),
        );

        Ok(())
    }
}
