//! # Gateway Response Parser
//!
//! Decodes the raw bytes returned by the gateway into a [`GatewayResponse`].
//!
//! ## Framing
//!
//! The protocol has no length prefix or envelope. Parsing starts at the
//! first occurrence of the literal `RESULT`; everything before it (for
//! example HTTP status line and headers, when the raw capture includes them)
//! is discarded. The remainder is decoded with [`NvpMap::decode`].
//!
//! This anchor search is kept for wire compatibility and is unsafe in one
//! case: if anything before the real `RESULT` field contains that literal
//! (a header value, a preamble), parsing starts in the wrong place.
//!
//! ## Classification
//!
//! A response succeeded exactly when it has a `RESULT` field equal to `"0"`.
//! A missing `RESULT`, any other value, or an empty response is a failure.
//! Result codes are not otherwise validated.

use serde::Serialize;

use crate::nvp::NvpMap;

const RESULT_ANCHOR: &str = "RESULT";

/// Decoded gateway response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayResponse {
    fields: NvpMap,
}

impl GatewayResponse {
    /// Parse raw response bytes. Never fails.
    ///
    /// Invalid UTF-8 is replaced, not rejected.
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        match text.find(RESULT_ANCHOR) {
            Some(start) => Self {
                fields: NvpMap::decode(&text[start..]),
            },
            None => Self::empty(),
        }
    }

    /// A response with no fields, as produced for a failed transport.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn succeeded(&self) -> bool {
        self.result() == Some("0")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &NvpMap {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter()
    }

    /// Raw `RESULT` value.
    pub fn result(&self) -> Option<&str> {
        self.get("RESULT")
    }

    /// `RESULT` as an integer. Negative codes are communication errors
    /// reported by the gateway itself.
    pub fn result_code(&self) -> Option<i32> {
        self.result().and_then(|r| r.trim().parse().ok())
    }

    /// Human-readable status (`RESPMSG`).
    pub fn message(&self) -> Option<&str> {
        self.get("RESPMSG")
    }

    /// Gateway transaction reference (`PNREF`).
    pub fn pnref(&self) -> Option<&str> {
        self.get("PNREF")
    }

    /// Issuer authorization code (`AUTHCODE`).
    pub fn auth_code(&self) -> Option<&str> {
        self.get("AUTHCODE")
    }

    /// Recurring profile identifier (`PROFILEID`).
    pub fn profile_id(&self) -> Option<&str> {
        self.get("PROFILEID")
    }

    /// Recurring profile action reference (`RPREF`).
    pub fn rp_ref(&self) -> Option<&str> {
        self.get("RPREF")
    }
}
