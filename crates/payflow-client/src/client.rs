//! # Transaction Orchestrator
//!
//! Runs one transaction end to end:
//!
//! 1. `validate()` the payload. A kind mismatch is returned as an error and
//!    nothing is sent.
//! 2. Derive a [`RequestId`] from the payload, the clock and the nonce
//!    source. A fresh identity is derived on every call.
//! 3. Submit through the transport, once.
//! 4. Parse and classify the response. Transport failures become a failed
//!    [`TransactionOutcome`] with an empty response and the error retained.

use payflow_core::{
    Clock, GatewayResponse, NoNonce, NonceSource, PayloadError, RequestId, SystemClock,
    TransactionPayload,
};
use serde::{Serialize, Serializer};

use crate::config::GatewayConfig;
use crate::error::{ClientError, TransportError};
use crate::transport::{GatewayTransport, HttpTransport};

/// Result of one [`GatewayClient::execute`] call.
#[derive(Debug, Serialize)]
pub struct TransactionOutcome {
    /// `true` only when the gateway answered `RESULT=0`.
    pub succeeded: bool,
    pub response: GatewayResponse,
    pub request_id: RequestId,
    #[serde(serialize_with = "serialize_transport_error")]
    pub transport_error: Option<TransportError>,
}

impl TransactionOutcome {
    fn from_response(request_id: RequestId, response: GatewayResponse) -> Self {
        Self {
            succeeded: response.succeeded(),
            response,
            request_id,
            transport_error: None,
        }
    }

    fn from_transport_error(request_id: RequestId, error: TransportError) -> Self {
        Self {
            succeeded: false,
            response: GatewayResponse::empty(),
            request_id,
            transport_error: Some(error),
        }
    }
}

fn serialize_transport_error<S: Serializer>(
    error: &Option<TransportError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Submits payloads to the gateway.
///
/// Holds no per-transaction state, so one client may be shared across tasks.
#[derive(Debug, Clone)]
pub struct GatewayClient<T = HttpTransport, C = SystemClock, N = NoNonce> {
    transport: T,
    clock: C,
    nonce: N,
}

impl GatewayClient {
    /// Create a client that talks HTTPS to the configured gateway.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport: HttpTransport::new(&config)?,
            clock: SystemClock,
            nonce: NoNonce,
        })
    }
}

impl<T, C, N> GatewayClient<T, C, N>
where
    T: GatewayTransport,
    C: Clock,
    N: NonceSource,
{
    /// Assemble a client from explicit collaborators.
    pub fn with_transport(transport: T, clock: C, nonce: N) -> Self {
        Self {
            transport,
            clock,
            nonce,
        }
    }

    /// Swap the nonce source, keeping transport and clock.
    pub fn with_nonce_source<M: NonceSource>(self, nonce: M) -> GatewayClient<T, C, M> {
        GatewayClient {
            transport: self.transport,
            clock: self.clock,
            nonce,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate, submit once, and classify.
    ///
    /// # Errors
    ///
    /// Only [`PayloadError`]. Network and gateway failures are reported in
    /// the returned outcome.
    pub async fn execute(
        &self,
        payload: &TransactionPayload,
    ) -> Result<TransactionOutcome, PayloadError> {
        payload.validate()?;

        let nonce = self.nonce.next_nonce();
        let request_id = RequestId::derive(payload, self.clock.now(), nonce.as_deref());
        self.submit(payload, request_id).await
    }

    /// Like [`execute`](Self::execute), but reuses an earlier identity so the
    /// gateway can recognise a resend of the same transaction.
    pub async fn resend(
        &self,
        payload: &TransactionPayload,
        request_id: RequestId,
    ) -> Result<TransactionOutcome, PayloadError> {
        payload.validate()?;
        self.submit(payload, request_id).await
    }

    async fn submit(
        &self,
        payload: &TransactionPayload,
        request_id: RequestId,
    ) -> Result<TransactionOutcome, PayloadError> {
        tracing::debug!(
            request_id = %request_id,
            kind = %payload.kind(),
            body = %payload.to_redacted_wire(),
            "submitting gateway transaction"
        );

        match self.transport.submit(payload.to_wire(), &request_id).await {
            Ok(raw) => {
                let response = GatewayResponse::parse(&raw);
                tracing::info!(
                    request_id = %request_id,
                    result = response.result().unwrap_or("<missing>"),
                    pnref = response.pnref().unwrap_or(""),
                    succeeded = response.succeeded(),
                    "gateway responded"
                );
                Ok(TransactionOutcome::from_response(request_id, response))
            }
            Err(error) => {
                tracing::warn!(request_id = %request_id, %error, "gateway transport failed");
                Ok(TransactionOutcome::from_transport_error(request_id, error))
            }
        }
    }
}
