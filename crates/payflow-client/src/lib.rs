//! # payflow-client -- Async client for the Payflow NVP gateway
//!
//! Adds the network half to `payflow-core`:
//! - **Configuration**: endpoint selection (test or live), timeouts, TLS policy
//! - **Transport**: a single HTTPS POST per submission with the gateway's
//!   `X-VPS-*` headers
//! - **Orchestration**: validate, derive a request identity, submit, parse
//!
//! ## Failure Model
//!
//! A payload that fails validation is an `Err` and is never sent. Once a
//! request leaves the process, every failure (timeout, refused connection,
//! non-2xx status, decline) is reported as a [`TransactionOutcome`] with
//! `succeeded == false`. There is no retry; a caller that resends should
//! reuse the outcome's [`RequestId`](payflow_core::RequestId) via
//! [`GatewayClient::resend`] so the gateway can detect the duplicate.
//!
//! ## Logging
//!
//! Emits `tracing` events only and installs no subscriber. Request bodies
//! are logged at `debug` in redacted form.

pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{GatewayClient, TransactionOutcome};
pub use config::{ConfigError, Environment, GatewayConfig};
pub use error::{ClientError, TransportError};
pub use transport::{GatewayTransport, HttpTransport, MockReply, MockTransport};
