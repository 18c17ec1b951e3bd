//! # Request Identity
//!
//! Every submission carries an `X-VPS-Request-ID` header that the gateway
//! uses to detect duplicate submissions of the same logical transaction.
//!
//! ## Derivation
//!
//! - Payload has a card account (`ACCT`): SHA-256 over
//!   `ACCT ‖ AMT ‖ timestamp ‖ "1" ‖ nonce`, where the timestamp is
//!   `YYYYMMDD` + hour without leading zero + `MMSS`.
//! - Otherwise: SHA-256 over the epoch seconds and the nonce.
//!
//! The first 16 bytes of the digest are rendered as 32 lowercase hex
//! characters.
//!
//! ## Collision Window
//!
//! Without a nonce the identity is deterministic for the same card, amount
//! and second. Two genuinely distinct purchases of the same amount on the
//! same card within one second produce the same token, and the gateway
//! will treat the second as a duplicate. Callers that need strict
//! idempotency should supply a [`NonceSource`] that yields one value per
//! logical transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::UnknownCodeError;
use crate::field::Field;
use crate::payload::TransactionPayload;

/// Hex length of a [`RequestId`].
pub const REQUEST_ID_LEN: usize = 32;

/// Fixed suffix mixed into card-derived identities.
const CARD_SALT: &str = "1";

/// An opaque per-submission idempotency token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Derive the identity for `payload` submitted at `at`.
    pub fn derive(payload: &TransactionPayload, at: DateTime<Utc>, nonce: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        match payload.get(Field::Account.as_str()) {
            Some(account) => {
                hasher.update(account.as_bytes());
                hasher.update(payload.get(Field::Amount.as_str()).unwrap_or("").as_bytes());
                hasher.update(at.format("%Y%m%d%-H%M%S").to_string().as_bytes());
                hasher.update(CARD_SALT.as_bytes());
            }
            None => {
                hasher.update(at.timestamp().to_string().as_bytes());
            }
        }
        if let Some(nonce) = nonce {
            hasher.update(nonce.as_bytes());
        }
        let digest = hasher.finalize();
        Self(
            digest[..REQUEST_ID_LEN / 2]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RequestId {
    type Err = UnknownCodeError;

    /// Accept a previously issued identity, e.g. to resend a transaction
    /// under the same `X-VPS-Request-ID`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == REQUEST_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(UnknownCodeError {
                kind: "request id",
                value: s.to_string(),
            })
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies extra uniqueness for [`RequestId::derive`].
pub trait NonceSource: Send + Sync {
    /// A nonce for the next submission, or `None` to rely on the timestamp.
    fn next_nonce(&self) -> Option<String>;
}

/// No nonce: identities depend only on payload and time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNonce;

impl NonceSource for NoNonce {
    fn next_nonce(&self) -> Option<String> {
        None
    }
}

/// A random UUID per submission, closing the same-second collision window.
///
/// Note that this also defeats duplicate detection for a genuine resend of
/// the same transaction; reuse the earlier [`RequestId`] for that.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn next_nonce(&self) -> Option<String> {
        Some(Uuid::new_v4().to_string())
    }
}
