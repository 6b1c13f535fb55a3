//! Callback-style entry points.
//!
//! Each call runs as its own Tokio task and ends by invoking exactly one
//! callback, exactly once. The returned [`CallHandle`] can cancel the task
//! before delivery; a cancelled call invokes nothing.

use std::future::Future;

use tokio::task::JoinHandle;

use lodestar_core::ApiResult;

use crate::routing::{ConflictCallback, Routed};

/// Handle to a call running in the background.
///
/// Dropping the handle detaches the call; it still completes and delivers.
#[derive(Debug)]
pub struct CallHandle {
    task: JoinHandle<()>,
}

impl CallHandle {
    /// Abandons the call. If the callback has not started yet it never runs.
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the callback has returned or the call was cancelled.
    pub async fn join(self) {
        if let Err(e) = self.task.await
            && e.is_panic()
        {
            tracing::error!("call callback panicked");
        }
    }
}

/// Runs `call` in the background and passes its result to `on_complete`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_with_callback<T, F, C>(call: F, on_complete: C) -> CallHandle
where
    T: Send + 'static,
    F: Future<Output = ApiResult<T>> + Send + 'static,
    C: FnOnce(ApiResult<T>) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let result = call.await;
        on_complete(result);
    });
    CallHandle { task }
}

/// Runs a conflict-aware `call` in the background and delivers through
/// [`Routed::deliver`].
///
/// Must be called from within a Tokio runtime.
pub fn spawn_with_conflict<T, F, C>(
    call: F,
    on_complete: C,
    on_conflict: Option<ConflictCallback>,
) -> CallHandle
where
    T: Send + 'static,
    F: Future<Output = Routed<T>> + Send + 'static,
    C: FnOnce(ApiResult<T>) + Send + 'static,
{
    let task = tokio::spawn(async move {
        call.await.deliver(on_complete, on_conflict);
    });
    CallHandle { task }
}
