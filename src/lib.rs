//! Lodestar - command-line client for the Lodestar server SDK.
//!
//! The SDK itself lives in the workspace crates:
//! - `lodestar-core`   - error codes, errors, results, call metrics
//! - `lodestar-client` - request dispatch, decoding, conflict routing, lobby API

pub mod commands;
pub mod config;

use std::sync::Arc;

use lodestar_client::{ApiClient, ConfigError, ReqwestTransport, ServerLobbyApi, TransportError};

/// Errors raised before any call is issued.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

/// Builds the lobby API from command-line configuration.
pub fn lobby_api(config: &config::Config) -> Result<(ServerLobbyApi, String), SetupError> {
    let server = config.server_config()?;
    let transport = ReqwestTransport::new(config.timeout())?;
    let client = ApiClient::with_shared_transport(Arc::new(transport));
    let api = ServerLobbyApi::from_config(&server, client)?;
    Ok((api, server.namespace))
}
