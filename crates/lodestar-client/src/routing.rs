//! Conflict-aware routing of a decoded result.
//!
//! Writes guarded by optimistic concurrency report a conflict when the
//! server-side state changed since the caller last read it. Those failures
//! are split off from ordinary ones so the caller can re-read and retry.

use lodestar_core::{ApiResult, Error, ErrorCode};

/// Codes that mark a concurrent-modification rejection by default.
pub const DEFAULT_CONFLICT_CODES: &[ErrorCode] = &[
    ErrorCode::PreconditionFailed,
    ErrorCode::PartyStorageOutdatedUpdateData,
];

/// Invoked with no arguments when a conflict is detected.
pub type ConflictCallback = Box<dyn FnOnce() + Send + 'static>;

/// A result after conflict detection.
#[derive(Debug)]
pub enum Routed<T> {
    /// Success, or a failure that is not a conflict.
    Completed(ApiResult<T>),
    /// The failure's top-level code is one of the conflict codes.
    Conflict(Error),
}

impl<T> Routed<T> {
    /// Classifies `result` against `conflict_codes`.
    ///
    /// Only the top-level code counts: a parse failure wrapping a
    /// conflict-range status is an ordinary failure.
    pub fn route(result: ApiResult<T>, conflict_codes: &[ErrorCode]) -> Self {
        match result {
            Err(err) if conflict_codes.contains(&err.code()) => Self::Conflict(err),
            other => Self::Completed(other),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Folds a conflict back into an ordinary failure.
    pub fn into_result(self) -> ApiResult<T> {
        match self {
            Self::Completed(result) => result,
            Self::Conflict(err) => Err(err),
        }
    }

    /// Invokes exactly one of the two callbacks.
    ///
    /// Without a conflict callback, a conflict reaches `on_complete` as a
    /// failure so it is never silently dropped.
    pub fn deliver<C>(self, on_complete: C, on_conflict: Option<ConflictCallback>)
    where
        C: FnOnce(ApiResult<T>),
    {
        match (self, on_conflict) {
            (Self::Conflict(err), Some(on_conflict)) => {
                tracing::debug!(code = %err.code(), "conflict delivered to conflict callback");
                on_conflict();
            }
            (Self::Conflict(err), None) => on_complete(Err(err)),
            (Self::Completed(result), _) => on_complete(result),
        }
    }
}
