//! Shared call pipeline: dispatch, decode, route, record.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use lodestar_core::{ApiResult, CallMetrics, CallOutcome, Error, ErrorCode};

use crate::decode;
use crate::dispatch::Call;
use crate::request::HttpRequest;
use crate::routing::Routed;
use crate::transport::{RawResponse, Transport};

/// Cloneable handle to a transport and its call metrics.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    metrics: CallMetrics,
}

impl ApiClient {
    pub fn new(transport: impl Transport) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// Uses a transport that is also shared with other clients.
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                metrics: CallMetrics::new(),
            }),
        }
    }

    pub fn metrics(&self) -> &CallMetrics {
        &self.inner.metrics
    }

    /// Sends `request` and returns the undecoded response.
    pub async fn send(&self, request: HttpRequest) -> ApiResult<RawResponse> {
        Call::new(request)
            .dispatch(self.inner.transport.as_ref(), &self.inner.metrics)
            .await
            .into_response()
    }

    fn record<T>(&self, result: &ApiResult<T>) {
        let outcome = match result {
            Ok(_) => CallOutcome::Success,
            Err(err) => CallOutcome::classify(err),
        };
        self.inner.metrics.record_outcome(outcome);
    }

    /// Sends `request` and decodes a JSON body into `T`.
    pub async fn call_json<T: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<T> {
        let result = match self.send(request).await {
            Ok(response) => decode::decode_json(&response),
            Err(err) => Err(err),
        };
        self.record(&result);
        result
    }

    /// Sends `request` and expects no value back.
    pub async fn call_empty(&self, request: HttpRequest) -> ApiResult {
        let result = match self.send(request).await {
            Ok(response) => decode::decode_empty(&response),
            Err(err) => Err(err),
        };
        self.record(&result);
        result
    }

    /// Sends `request`, decoding success into `T` and failure into `U`.
    pub async fn call_json_with_error<T, U>(&self, request: HttpRequest) -> ApiResult<T, U>
    where
        T: DeserializeOwned,
        U: DeserializeOwned + From<Error>,
    {
        match self.send(request).await {
            Ok(response) if response.is_success() => {
                // Classify before the SDK error is folded into `U`.
                let result = decode::decode_json(&response);
                self.record(&result);
                result.map_err(U::from)
            }
            Ok(response) => {
                let outcome = CallOutcome::classify(&decode::failure_error(&response));
                self.inner.metrics.record_outcome(outcome);
                decode::decode_json_with_error(&response)
            }
            Err(err) => {
                self.inner.metrics.record_outcome(CallOutcome::Transport);
                Err(U::from(err))
            }
        }
    }

    /// Sends a write guarded by optimistic concurrency and splits conflicts
    /// (failures whose top-level code is in `conflict_codes`) from the rest.
    pub async fn call_json_with_conflict<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        conflict_codes: &[ErrorCode],
    ) -> Routed<T> {
        let result = match self.send(request).await {
            Ok(response) => decode::decode_json(&response),
            Err(err) => Err(err),
        };
        let routed = Routed::route(result, conflict_codes);
        match &routed {
            Routed::Conflict(err) => {
                tracing::warn!(code = %err.code(), "write rejected by concurrent modification");
                self.inner.metrics.record_outcome(CallOutcome::Conflict);
            }
            Routed::Completed(result) => self.record(result),
        }
        routed
    }
}
