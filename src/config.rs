//! Command-line configuration via CLI args and environment variables.

use std::collections::HashMap;
use std::time::Duration;

use clap::{Parser, Subcommand};

use lodestar_client::{ConfigError, ServerConfig};

/// Command-line client for the Lodestar server lobby API.
#[derive(Parser, Debug, Clone)]
#[command(name = "lodestar", version, about)]
pub struct Config {
    /// Backend base URL, e.g. https://demo.example.com.
    #[arg(long, env = "LODESTAR_BASE_URL")]
    pub base_url: Option<String>,

    /// Game namespace.
    #[arg(long, env = "LODESTAR_NAMESPACE")]
    pub namespace: Option<String>,

    /// Server access token sent as a bearer token.
    #[arg(long, env = "LODESTAR_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// JSON server config file. Flags override its values.
    #[arg(long, env = "LODESTAR_CONFIG")]
    pub config_file: Option<String>,

    /// Lobby service URL. Derived from the base URL when omitted.
    #[arg(long, env = "LODESTAR_LOBBY_URL")]
    pub lobby_url: Option<String>,

    /// Request timeout in seconds (0 = disabled).
    #[arg(long, default_value_t = 30, env = "LODESTAR_TIMEOUT")]
    pub timeout: u64,

    /// Log level.
    #[arg(long, default_value = "warn", env = "LODESTAR_LOG_LEVEL")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[arg(long, default_value = "text", env = "LODESTAR_LOG_FORMAT")]
    pub log_format: String,

    /// Print call metrics to stderr after the command.
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read a party's storage.
    GetPartyStorage {
        party_id: String,
    },

    /// Write a party's custom attributes, based on a known `updatedAt`.
    WritePartyStorage {
        party_id: String,
        /// Custom attributes as a JSON object.
        #[arg(long)]
        data: String,
        /// `updatedAt` of the party state the write is based on.
        #[arg(long)]
        updated_at: i64,
    },

    /// Read the party a user belongs to.
    GetUserParty {
        user_id: String,
    },

    /// Read one session attribute of a user.
    GetSessionAttribute {
        user_id: String,
        key: String,
    },

    /// Read all session attributes of a user.
    GetSessionAttributes {
        user_id: String,
    },

    /// Set session attributes of a user.
    SetSessionAttributes {
        user_id: String,
        /// Attributes as KEY=VALUE pairs.
        #[arg(required = true, value_parser = parse_key_val)]
        attributes: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

impl Config {
    /// Parses configuration from CLI args and env vars.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Builds the server config: file first, then flag overrides, then
    /// sanitize, validate and expand.
    pub fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut server = match &self.config_file {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(namespace) = &self.namespace {
            server.namespace.clone_from(namespace);
        }
        if let Some(base_url) = &self.base_url {
            server.base_url.clone_from(base_url);
        }
        if let Some(lobby_url) = &self.lobby_url {
            server.lobby_server_url = Some(lobby_url.clone());
        }
        server.prepare()
    }
}

/// Collects `KEY=VALUE` pairs; later keys win.
pub fn attribute_map(pairs: &[(String, String)]) -> HashMap<String, String> {
    pairs.iter().cloned().collect()
}
