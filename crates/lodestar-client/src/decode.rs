//! Turns a [`RawResponse`] into an [`ApiResult`].
//!
//! Status handling:
//!
//! - a body-level service error code always wins, even inside a 2xx,
//! - otherwise a 2xx is decoded into the expected type,
//! - otherwise the HTTP status becomes the error code.
//!
//! A body that cannot be parsed becomes `InvalidResponse`. When that happens
//! on a failure status, the status error is kept as the inner error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use lodestar_core::{ApiResult, Error, ErrorCode};

use crate::transport::RawResponse;

/// Keys that may carry a service error code, in lookup order.
const CODE_KEYS: [&str; 3] = ["errorCode", "numericErrorCode", "code"];
/// On 2xx a plain `code` field is payload data, not an error marker.
const SUCCESS_CODE_KEYS: [&str; 2] = ["errorCode", "numericErrorCode"];
const MESSAGE_KEYS: [&str; 3] = ["errorMessage", "message", "error"];

/// A service error reported inside a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    pub code: i64,
    pub message: Option<String>,
    pub message_variables: Option<Value>,
}

impl ServiceError {
    /// Extracts a non-zero numeric service code from a JSON object.
    fn from_value(value: &Value, code_keys: &[&str]) -> Option<Self> {
        let object = value.as_object()?;
        let code = code_keys
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_i64))
            .filter(|code| *code != 0)?;

        Some(Self {
            code,
            message: body_message(value),
            message_variables: object.get("messageVariables").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Converts to an SDK error. Codes the SDK does not know fall back to the
    /// status mapping and keep the raw code in the message. So do codes that
    /// name a non-failure HTTP status, since a failure never carries them.
    pub fn into_error(self, status: u16) -> Error {
        match ErrorCode::from_code(self.code) {
            Some(code) if code != ErrorCode::None && !is_non_failure_status(code) => {
                Error::create(code, self.message, self.message_variables)
            }
            _ => {
                let fallback = if (200..300).contains(&status) {
                    ErrorCode::UnknownError
                } else {
                    ErrorCode::from_http_status(status)
                };
                let message = match self.message {
                    Some(m) => format!("service error {}: {m}", self.code),
                    None => format!("service error {}", self.code),
                };
                tracing::debug!(service_code = self.code, status, "unrecognised service error code");
                Error::create(fallback, Some(message), self.message_variables)
            }
        }
    }
}

fn is_non_failure_status(code: ErrorCode) -> bool {
    code.is_http_status() && code.code() < 400
}

fn body_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    MESSAGE_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Looks for a service error in a 2xx body.
fn success_body_error(response: &RawResponse) -> Option<Error> {
    if is_blank(&response.body) {
        return None;
    }
    let value = serde_json::from_slice::<Value>(&response.body).ok()?;
    ServiceError::from_value(&value, &SUCCESS_CODE_KEYS).map(|e| e.into_error(response.status))
}

/// Builds the error for a non-2xx response.
pub fn failure_error(response: &RawResponse) -> Error {
    let status_code = ErrorCode::from_http_status(response.status);
    if is_blank(&response.body) {
        return Error::new(status_code);
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(value) => match ServiceError::from_value(&value, &CODE_KEYS) {
            Some(service) => service.into_error(response.status),
            None => Error::create(status_code, body_message(&value), None),
        },
        Err(e) => Error::with_message(status_code, format!("HTTP {}", response.status))
            .wrap_with_message(
                ErrorCode::InvalidResponse,
                format!("error response could not be parsed: {e}"),
            ),
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let body: &[u8] = if is_blank(body) { b"null" } else { body };
    serde_json::from_slice(body).map_err(|e| {
        Error::with_message(
            ErrorCode::InvalidResponse,
            format!("response could not be parsed: {e}"),
        )
    })
}

/// Decodes a response whose success body is JSON of type `T`.
///
/// An empty 2xx body is read as JSON `null`, so `T = Option<_>` or `()`
/// accept it and anything else reports `InvalidResponse`.
pub fn decode_json<T: DeserializeOwned>(response: &RawResponse) -> ApiResult<T> {
    if !response.is_success() {
        return Err(failure_error(response));
    }
    if let Some(err) = success_body_error(response) {
        return Err(err);
    }
    parse_body(&response.body)
}

/// Decodes a response that carries no value. Any 2xx body is ignored unless
/// it reports a service error.
pub fn decode_empty(response: &RawResponse) -> ApiResult {
    if !response.is_success() {
        return Err(failure_error(response));
    }
    match success_body_error(response) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Decodes into `T` on success and into the caller's payload `U` on failure.
///
/// When the failure body is empty or is not a valid `U`, the SDK error for the
/// response is converted into `U` instead.
pub fn decode_json_with_error<T, U>(response: &RawResponse) -> ApiResult<T, U>
where
    T: DeserializeOwned,
    U: DeserializeOwned + From<Error>,
{
    if response.is_success() {
        return decode_json(response).map_err(U::from);
    }
    if is_blank(&response.body) {
        return Err(U::from(failure_error(response)));
    }
    match serde_json::from_slice::<U>(&response.body) {
        Ok(payload) => Err(payload),
        Err(e) => {
            tracing::debug!(error = %e, "failure body does not match the custom error shape");
            Err(U::from(failure_error(response)))
        }
    }
}
