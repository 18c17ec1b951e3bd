//! # Gateway Transport Adapter
//!
//! Moves an encoded payload to the gateway and returns the raw response
//! bytes. One POST per call, no retry, no connection reuse.
//!
//! ## Architecture
//!
//! The [`GatewayTransport`] trait abstracts over the HTTP stack so the
//! orchestrator can be exercised without a network. [`HttpTransport`] is the
//! `reqwest` implementation used in production; [`MockTransport`] replays
//! canned replies and records what it was sent.
//!
//! ## Request Shape
//!
//! | Header | Value |
//! |--------|-------|
//! | `Content-Type` | `text/namevalue` |
//! | `X-VPS-Timeout` | `client_timeout_hint_secs` |
//! | `X-VPS-VIT-Client-Certification-Id` | `certification_id` |
//! | `X-VPS-Request-ID` | [`RequestId`] of this submission |
//! | `Connection` | `close` |
//!
//! The body is sent exactly as encoded, without URL encoding.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use payflow_core::RequestId;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION, CONTENT_TYPE};
use url::Url;

use crate::config::{ConfigError, GatewayConfig};
use crate::error::{ClientError, TransportError};

const NVP_CONTENT_TYPE: &str = "text/namevalue";
const TIMEOUT_HEADER: HeaderName = HeaderName::from_static("x-vps-timeout");
const CERTIFICATION_HEADER: HeaderName =
    HeaderName::from_static("x-vps-vit-client-certification-id");
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-vps-request-id");

/// Carries one encoded payload to the gateway.
///
/// Implementations must be `Send + Sync` so a client can be shared across
/// tasks.
pub trait GatewayTransport: Send + Sync {
    /// POST `body` tagged with `request_id` and return the raw response body.
    fn submit(
        &self,
        body: String,
        request_id: &RequestId,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Build a transport from a validated configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(NVP_CONTENT_TYPE));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        headers.insert(TIMEOUT_HEADER, HeaderValue::from(config.client_timeout_hint_secs));
        headers.insert(
            CERTIFICATION_HEADER,
            HeaderValue::from_str(&config.certification_id).map_err(|_| {
                ConfigError::InvalidValue {
                    name: "certification_id".to_string(),
                    value: config.certification_id.clone(),
                }
            })?,
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::ClientInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn classify(&self, source: reqwest::Error) -> TransportError {
        let endpoint = self.endpoint.to_string();
        if source.is_timeout() {
            TransportError::Timeout {
                endpoint,
                timeout_secs: self.timeout_secs,
            }
        } else if source.is_connect() {
            TransportError::Connect { endpoint, source }
        } else {
            TransportError::Http { endpoint, source }
        }
    }
}

impl GatewayTransport for HttpTransport {
    async fn submit(&self, body: String, request_id: &RequestId) -> Result<Vec<u8>, TransportError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Status {
                endpoint: self.endpoint.to_string(),
                status,
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.classify(e))?;
        Ok(bytes.to_vec())
    }
}

/// Canned behaviour for [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return these bytes as the response body.
    Body(Vec<u8>),
    /// Fail as if the gateway answered with a non-2xx status.
    Status { status: u16, body: String },
    /// Fail as if the request timed out.
    Timeout,
}

/// A submission captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub body: String,
    pub request_id: RequestId,
}

/// In-memory transport for tests and dry runs.
///
/// Every call is recorded and answered with the same [`MockReply`].
#[derive(Debug)]
pub struct MockTransport {
    reply: MockReply,
    submissions: Mutex<Vec<RecordedSubmission>>,
}

impl MockTransport {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Answer every submission with `RESULT=0`.
    pub fn approving() -> Self {
        Self::new(MockReply::Body(
            b"RESULT=0&PNREF=MOCK00000001&RESPMSG=Approved&AUTHCODE=000000".to_vec(),
        ))
    }

    pub fn replying(raw: impl Into<Vec<u8>>) -> Self {
        Self::new(MockReply::Body(raw.into()))
    }

    /// Submissions received so far, oldest first.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl GatewayTransport for MockTransport {
    async fn submit(&self, body: String, request_id: &RequestId) -> Result<Vec<u8>, TransportError> {
        self.submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedSubmission {
                body,
                request_id: request_id.clone(),
            });

        match &self.reply {
            MockReply::Body(raw) => Ok(raw.clone()),
            MockReply::Status { status, body } => Err(TransportError::Status {
                endpoint: "mock".to_string(),
                status: *status,
                body: body.clone(),
            }),
            MockReply::Timeout => Err(TransportError::Timeout {
                endpoint: "mock".to_string(),
                timeout_secs: 0,
            }),
        }
    }
}
