//! Lodestar Client: async request dispatch for the Lodestar SDK.
//!
//! A call flows through four stages:
//!
//! 1. [`request::HttpRequestBuilder`] resolves an immutable [`HttpRequest`],
//! 2. [`dispatch::Call`] hands it to a [`Transport`] and suspends until delivery,
//! 3. [`decode`] turns the raw response into an [`ApiResult`],
//! 4. [`routing::Routed`] splits concurrent-modification conflicts off
//!    for writes that need it.
//!
//! [`ApiClient`] ties the stages together and records [`CallMetrics`].
//! [`lobby::ServerLobbyApi`] is the service surface built on top.
//!
//! [`ApiResult`]: lodestar_core::ApiResult
//! [`CallMetrics`]: lodestar_core::CallMetrics

pub mod callback;
pub mod client;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod lobby;
pub mod models;
pub mod request;
pub mod routing;
pub mod transport;

pub use callback::CallHandle;
pub use client::ApiClient;
pub use config::{ConfigError, ServerConfig};
pub use lobby::ServerLobbyApi;
pub use request::{HttpRequest, HttpRequestBuilder, MediaType};
pub use routing::{ConflictCallback, DEFAULT_CONFLICT_CODES, Routed};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

pub use lodestar_core::{ApiResult, ApiResultExt, Error, ErrorCode};
