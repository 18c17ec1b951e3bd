//! Gateway client error types.

use crate::config::ConfigError;

/// Failures of a single gateway round trip.
///
/// The orchestrator folds these into a failed
/// [`TransactionOutcome`](crate::TransactionOutcome) rather than returning
/// them, since the transaction may or may not have reached the processor.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No complete response within the configured timeout.
    #[error("gateway request to {endpoint} timed out after {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// TCP or TLS connection could not be established.
    #[error("could not connect to gateway at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Any other HTTP-level failure while sending or reading.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Gateway answered with a non-2xx status.
    #[error("gateway {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to initialise HTTP client: {reason}")]
    ClientInit { reason: String },
}

/// Errors raised while building a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
