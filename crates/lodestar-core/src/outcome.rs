//! Outcome of one SDK call.
//!
//! All three result shapes are the same sum type:
//!
//! - `ApiResult<T>` carries a value or an [`Error`],
//! - `ApiResult<T, U>` carries a value or a caller-chosen error payload,
//! - `ApiResult` (i.e. `ApiResult<()>`) is a bare success/failure signal.
//!
//! Success and failure are mutually exclusive by construction. Asking a
//! failure for its value (or a success for its error) returns `None`; it
//! never panics and never fabricates a default.

use serde_json::Value;

use crate::error::Error;
use crate::error_code::ErrorCode;

/// Outcome of an SDK call.
pub type ApiResult<T = (), E = Error> = Result<T, E>;

/// Success carrying `value`.
pub fn ok<T, E>(value: T) -> ApiResult<T, E> {
    Ok(value)
}

/// Failure built from a code, using the code's default message.
pub fn fail<T>(code: ErrorCode) -> ApiResult<T> {
    Err(Error::new(code))
}

/// Failure built from a code and an explicit message.
pub fn fail_with<T>(code: ErrorCode, message: impl Into<String>) -> ApiResult<T> {
    Err(Error::with_message(code, message))
}

/// Failure built from every optional part of an [`Error`].
pub fn fail_with_details<T>(
    code: ErrorCode,
    message: Option<String>,
    message_variables: Option<Value>,
) -> ApiResult<T> {
    Err(Error::create(code, message, message_variables))
}

/// Accessors shared by every result shape.
pub trait ApiResultExt<T, E> {
    /// `true` exactly when the result holds an error.
    fn is_error(&self) -> bool;

    /// The success value, or `None` on failure.
    fn value(&self) -> Option<&T>;

    /// The error, or `None` on success.
    fn error(&self) -> Option<&E>;
}

impl<T, E> ApiResultExt<T, E> for ApiResult<T, E> {
    fn is_error(&self) -> bool {
        self.is_err()
    }

    fn value(&self) -> Option<&T> {
        self.as_ref().ok()
    }

    fn error(&self) -> Option<&E> {
        self.as_ref().err()
    }
}

/// Code of the error carried by a result, `ErrorCode::None` on success.
pub fn error_code<T>(result: &ApiResult<T>) -> ErrorCode {
    result.as_ref().err().map_or(ErrorCode::None, Error::code)
}
