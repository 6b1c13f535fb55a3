//! Lodestar Core: the error and result model behind every Lodestar SDK call.
//!
//! This crate contains the transport-agnostic pieces:
//! the unified [`ErrorCode`] namespace, the chainable [`Error`], the
//! [`ApiResult`] outcome type, and call metrics.
//!
//! The HTTP client crate (`lodestar-client`) depends on this crate and turns
//! transport failures, HTTP statuses and service error codes into these types.
//!
//! No HTTP client and no async runtime.

pub mod error;
pub mod error_code;
pub mod metrics;
pub mod outcome;

pub use error::Error;
pub use error_code::ErrorCode;
pub use metrics::{CallMetrics, CallOutcome, InFlight};
pub use outcome::{ApiResult, ApiResultExt};
