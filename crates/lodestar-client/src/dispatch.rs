//! Single-shot request dispatch.
//!
//! A [`Call`] moves through `Idle -> Sent -> {Completed | TransportFailed}`.
//! [`Call::dispatch`] consumes the call, so a finished call cannot be sent
//! again; retrying means building a new one.

use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue};
use tracing::Instrument;
use uuid::Uuid;

use lodestar_core::{ApiResult, CallMetrics, Error, ErrorCode};

use crate::request::HttpRequest;
use crate::transport::{RawResponse, Transport, TransportError};

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Lifecycle of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Built, not yet handed to the transport.
    Idle,
    /// Handed to the transport, awaiting delivery.
    Sent,
    /// A raw response was delivered.
    Completed,
    /// No response could be obtained.
    TransportFailed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::TransportFailed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Sent)
                | (Self::Sent, Self::Completed)
                | (Self::Sent, Self::TransportFailed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sent => "sent",
            Self::Completed => "completed",
            Self::TransportFailed => "transport_failed",
        }
    }
}

/// A request that has not been sent yet.
#[derive(Debug)]
pub struct Call {
    id: Uuid,
    state: CallState,
    request: HttpRequest,
}

impl Call {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: CallState::Idle,
            request,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal call transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = self.state.as_str(), to = next.as_str(), "call state");
        self.state = next;
    }

    /// Hands the request to `transport` and suspends until it delivers.
    ///
    /// The calling task yields while the transport works; no thread is
    /// blocked. The request is tagged with an `x-request-id` header (the call
    /// id) unless the caller already set one.
    pub async fn dispatch(mut self, transport: &dyn Transport, metrics: &CallMetrics) -> Dispatched {
        let span = tracing::debug_span!(
            "call",
            call_id = %self.id,
            method = %self.request.method(),
            url = %self.request.url(),
        );

        async move {
            let mut request = self.request.clone();
            if !request.headers().contains_key(&X_REQUEST_ID)
                && let Ok(val) = HeaderValue::from_str(&self.id.to_string())
            {
                request = request.with_header(X_REQUEST_ID.clone(), val);
            }

            self.advance(CallState::Sent);
            let in_flight = metrics.record_sent();
            let started = Instant::now();

            let delivered = transport.send(request).await;

            let elapsed_us = started.elapsed().as_micros() as u64;
            metrics.record_delivered(elapsed_us);
            drop(in_flight);

            let delivery = match delivered {
                Ok(response) => {
                    self.advance(CallState::Completed);
                    tracing::debug!(status = response.status, elapsed_us, "response delivered");
                    Ok(response)
                }
                Err(err) => {
                    self.advance(CallState::TransportFailed);
                    tracing::warn!(error = %err, elapsed_us, "no response obtained");
                    Err(transport_failure(&err))
                }
            };

            Dispatched {
                id: self.id,
                state: self.state,
                delivery,
            }
        }
        .instrument(span)
        .await
    }
}

/// Converts a transport failure into an SDK error.
pub fn transport_failure(err: &TransportError) -> Error {
    let kind = match err {
        TransportError::Connection(_) => "connection",
        TransportError::Timeout => "timeout",
        TransportError::Other(_) => "other",
    };
    Error::with_message(ErrorCode::NetworkError, err.to_string())
        .with_variables(serde_json::json!({ "kind": kind }))
}

/// A call in a terminal state.
#[derive(Debug)]
pub struct Dispatched {
    id: Uuid,
    state: CallState,
    delivery: ApiResult<RawResponse>,
}

impl Dispatched {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Either `Completed` or `TransportFailed`.
    pub fn state(&self) -> CallState {
        self.state
    }

    /// The raw response, or the transport failure as an `Error`.
    pub fn into_response(self) -> ApiResult<RawResponse> {
        self.delivery
    }
}
