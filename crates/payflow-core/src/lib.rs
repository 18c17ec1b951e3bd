//! # payflow-core -- Foundational Types for the Payflow NVP Client
//!
//! This crate is the network-free half of the client. It turns loosely typed
//! caller input into protocol-safe name-value pairs, derives the per-request
//! identity header, and decodes the gateway's `&`-delimited responses.
//! `payflow-client` depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Sanitize on the way in.** Every typed setter on
//!    [`TransactionPayload`] runs its value through [`sanitize`] before it is
//!    stored. The wire format has no escaping, so the payload never holds raw
//!    caller text (CVV2 and extension fields are the documented exceptions).
//!
//! 2. **Degrade, don't reject.** Sanitizers are total. Garbage input becomes
//!    an empty string or a zero amount, never an error.
//!
//! 3. **Closed enums for protocol codes.** `TRXTYPE`, `TENDER`, `ACTION`,
//!    `PAYPERIOD` and `CURRENCY` are enums with exhaustive `as_str()` maps.
//!
//! 4. **Collaborators are explicit.** The caller IP is a constructor
//!    argument and time comes from a [`Clock`]; nothing reads ambient state.
//!
//! ## Crate Policy
//!
//! - No network I/O.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod clock;
pub mod error;
pub mod field;
pub mod nvp;
pub mod payload;
pub mod request_id;
pub mod response;
pub mod sanitize;

// Re-export primary types for ergonomic imports.
pub use clock::{default_profile_start, Clock, FixedClock, SystemClock};
pub use error::{PayloadError, UnknownCodeError};
pub use field::{Currency, Field, PayPeriod, ProfileAction, Tender, TransactionType};
pub use nvp::NvpMap;
pub use payload::{MerchantIdentity, TransactionKind, TransactionPayload, Verbosity};
pub use request_id::{NoNonce, NonceSource, RandomNonce, RequestId};
pub use response::GatewayResponse;
pub use sanitize::Amount;
