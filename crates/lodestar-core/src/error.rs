//! Structured, chainable failure description.
//!
//! An [`Error`] is built once and never mutated. Adding context is done with
//! [`Error::wrap_with`], which allocates a new outer node owning the previous
//! error as its cause. The chain only points inward, so it cannot form a cycle.

use serde::Serialize;
use serde_json::Value;

use crate::error_code::ErrorCode;

/// A failure reported by an SDK call.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    /// Opaque data used by presentation layers to fill message templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    message_variables: Option<Value>,
    #[source]
    #[serde(skip_serializing_if = "Option::is_none")]
    inner_error: Option<Box<Error>>,
}

impl Error {
    /// Creates an error whose message is the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self::create(code, None, None)
    }

    /// Creates an error with an explicit message. An empty message falls back
    /// to the code's default message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::create(code, Some(message.into()), None)
    }

    /// Creates an error from all of its optional parts.
    ///
    /// `ErrorCode::None` means "no error" and is replaced by
    /// `ErrorCode::UnknownError`, since an `Error` always describes a failure.
    pub fn create(code: ErrorCode, message: Option<String>, message_variables: Option<Value>) -> Self {
        let code = if code == ErrorCode::None {
            tracing::warn!("error created with ErrorCode::None, reporting UnknownError instead");
            ErrorCode::UnknownError
        } else {
            code
        };

        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => code.default_message().into_owned(),
        };

        Self {
            code,
            message,
            message_variables,
            inner_error: None,
        }
    }

    /// Attaches message variables. Consumes the error while it is still being
    /// built, before it is handed to anyone else.
    #[must_use]
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.message_variables = Some(variables);
        self
    }

    /// Returns a new error with `code` whose cause is `self`.
    #[must_use]
    pub fn wrap_with(self, code: ErrorCode) -> Self {
        self.wrap_with_details(code, None, None)
    }

    /// Returns a new error with `code` and `message` whose cause is `self`.
    #[must_use]
    pub fn wrap_with_message(self, code: ErrorCode, message: impl Into<String>) -> Self {
        self.wrap_with_details(code, Some(message.into()), None)
    }

    /// Returns a new error whose cause is `self`, with every field explicit.
    #[must_use]
    pub fn wrap_with_details(
        self,
        code: ErrorCode,
        message: Option<String>,
        message_variables: Option<Value>,
    ) -> Self {
        let mut outer = Self::create(code, message, message_variables);
        outer.inner_error = Some(Box::new(self));
        outer
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_variables(&self) -> Option<&Value> {
        self.message_variables.as_ref()
    }

    /// The error this one was wrapped from, if any.
    pub fn inner_error(&self) -> Option<&Error> {
        self.inner_error.as_deref()
    }

    /// Iterates from this error down to the root cause.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The innermost error of the chain.
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Some(inner) = current.inner_error() {
            current = inner;
        }
        current
    }

    /// Whether any error in the chain carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.chain().any(|e| e.code == code)
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Iterator over an error and its causes, outermost first.
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.inner_error();
        Some(current)
    }
}
