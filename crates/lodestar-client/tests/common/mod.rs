use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use lodestar_client::{HttpRequest, HttpRequestBuilder, RawResponse, Transport, TransportError};

type Responder = dyn Fn(&HttpRequest) -> Result<RawResponse, TransportError> + Send + Sync;

/// Transport answering every request through a closure, after an optional
/// delay. Counts the requests it receives.
pub struct ScriptedTransport {
    respond: Box<Responder>,
    delay: Duration,
    pub sends: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            sends: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answers `status` with `body`.
    pub fn fixed(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(RawResponse::new(status, body)))
    }

    /// Never obtains a response.
    #[allow(dead_code)]
    pub fn down() -> Self {
        Self::new(|_| Err(TransportError::Connection("connection refused".to_owned())))
    }

    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(&request)
    }
}

#[allow(dead_code)]
pub fn get(url: &str) -> HttpRequest {
    HttpRequestBuilder::get(url).build().unwrap()
}
