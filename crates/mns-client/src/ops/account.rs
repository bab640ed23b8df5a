//! Account-level attribute operations.

use super::{Operation, PARAM_ACCOUNT_META};
use crate::error::{Error, ValidationError};
use crate::types::AccountAttributes;
use crate::wire::{HttpMethod, WireRequest, WireResponse};
use crate::xml::{self, XmlBuilder};

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;

/// Response carrying the account's current attributes
#[derive(Debug, Clone)]
pub struct GetAccountAttributesResponse {
    pub status: u16,
    pub attributes: AccountAttributes,
}

/// Response for an account attribute update
#[derive(Debug, Clone)]
pub struct SetAccountAttributesResponse {
    pub status: u16,
}

pub(crate) struct GetAccountAttributes;

impl Operation for GetAccountAttributes {
    type Response = GetAccountAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        Ok(WireRequest::new(HttpMethod::Get, "/").with_parameter(PARAM_ACCOUNT_META, "true"))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        let fields = xml::parse_flat(&response.body_text())?;
        Ok(GetAccountAttributesResponse {
            status: response.status,
            attributes: AccountAttributes {
                logging_bucket: fields.get("LoggingBucket").cloned(),
            },
        })
    }
}

pub(crate) struct SetAccountAttributes<'a> {
    pub attributes: &'a AccountAttributes,
}

impl Operation for SetAccountAttributes<'_> {
    type Response = SetAccountAttributesResponse;

    fn marshall(&self) -> Result<WireRequest, ValidationError> {
        let mut xml = XmlBuilder::new("Account");
        xml.element_opt("LoggingBucket", &self.attributes.logging_bucket);

        Ok(WireRequest::new(HttpMethod::Put, "/")
            .with_parameter(PARAM_ACCOUNT_META, "true")
            .with_body(xml.finish()))
    }

    fn unmarshall(&self, response: &WireResponse) -> Result<Self::Response, Error> {
        Ok(SetAccountAttributesResponse {
            status: response.status,
        })
    }
}
