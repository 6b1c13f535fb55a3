//! Server-side SDK configuration.
//!
//! Stored as JSON with PascalCase keys. Service URLs that are left out are
//! derived from `BaseUrl` by [`ServerConfig::expand`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_CACHE_SIZE: i32 = 100;
const DEFAULT_CACHE_LIFETIME: i32 = 100;
const DEFAULT_AMS_HEARTBEAT_INTERVAL: i32 = 15;

/// Errors raised while loading or validating a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("server namespace must not be empty")]
    MissingNamespace,

    #[error("server base URL must not be empty")]
    MissingBaseUrl,

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Backend endpoints and client-side limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerConfig {
    pub namespace: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_server_url: Option<String>,
    #[serde(rename = "DSHubServerUrl", skip_serializing_if = "Option::is_none")]
    pub dshub_server_url: Option<String>,
    #[serde(rename = "DSMControllerServerUrl", skip_serializing_if = "Option::is_none")]
    pub dsm_controller_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_manager_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_telemetry_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_save_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchmaking_server_url: Option<String>,
    #[serde(rename = "MatchmakingV2ServerUrl", skip_serializing_if = "Option::is_none")]
    pub matchmaking_v2_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_pass_server_url: Option<String>,
    #[serde(rename = "AMSServerUrl", skip_serializing_if = "Option::is_none")]
    pub ams_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(rename = "AMSHeartbeatInterval")]
    pub ams_heartbeat_interval: i32,
    pub maximum_cache_size: i32,
    pub maximum_cache_life_time: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            base_url: String::new(),
            iam_server_url: None,
            dshub_server_url: None,
            dsm_controller_server_url: None,
            statistic_server_url: None,
            platform_server_url: None,
            qos_manager_server_url: None,
            game_telemetry_server_url: None,
            achievement_server_url: None,
            lobby_server_url: None,
            session_server_url: None,
            cloud_save_server_url: None,
            matchmaking_server_url: None,
            matchmaking_v2_server_url: None,
            season_pass_server_url: None,
            ams_server_url: None,
            redirect_uri: None,
            ams_heartbeat_interval: DEFAULT_AMS_HEARTBEAT_INTERVAL,
            maximum_cache_size: DEFAULT_CACHE_SIZE,
            maximum_cache_life_time: DEFAULT_CACHE_LIFETIME,
        }
    }
}

impl ServerConfig {
    /// Creates a config for `namespace` on `base_url`, other fields default.
    pub fn new(namespace: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Sanitizes, validates and expands in one step. This is what a caller
    /// normally wants before building service clients.
    pub fn prepare(mut self) -> Result<Self, ConfigError> {
        self.sanitize_base_url()?;
        self.check_required()?;
        self.expand();
        Ok(self)
    }

    /// Service URL slots with their path suffix under the base URL.
    fn service_urls_mut(&mut self) -> [(&mut Option<String>, &'static str); 15] {
        [
            (&mut self.iam_server_url, "/iam"),
            (&mut self.dshub_server_url, "/dshub"),
            (&mut self.dsm_controller_server_url, "/dsmcontroller"),
            (&mut self.platform_server_url, "/platform"),
            (&mut self.statistic_server_url, "/social"),
            (&mut self.qos_manager_server_url, "/qosm"),
            (&mut self.game_telemetry_server_url, "/game-telemetry"),
            (&mut self.achievement_server_url, "/achievement"),
            (&mut self.lobby_server_url, "/lobby"),
            (&mut self.session_server_url, "/session"),
            (&mut self.cloud_save_server_url, "/cloudsave"),
            (&mut self.matchmaking_server_url, "/matchmaking"),
            (&mut self.matchmaking_v2_server_url, "/match2"),
            (&mut self.season_pass_server_url, "/seasonpass"),
            (&mut self.ams_server_url, "/ams"),
        ]
    }

    /// Fills every missing service URL from the base URL and resets
    /// non-positive limits to their defaults.
    pub fn expand(&mut self) {
        if self.base_url.is_empty() {
            return;
        }
        let base = self.base_url.clone();
        for (slot, suffix) in self.service_urls_mut() {
            if slot.as_deref().is_none_or(str::is_empty) {
                *slot = Some(format!("{base}{suffix}"));
            }
        }

        if self.maximum_cache_size <= 0 {
            tracing::warn!(
                value = self.maximum_cache_size,
                default = DEFAULT_CACHE_SIZE,
                "invalid maximum cache size, using default"
            );
            self.maximum_cache_size = DEFAULT_CACHE_SIZE;
        }
        if self.maximum_cache_life_time <= 0 {
            tracing::warn!(
                value = self.maximum_cache_life_time,
                default = DEFAULT_CACHE_LIFETIME,
                "invalid maximum cache lifetime, using default"
            );
            self.maximum_cache_life_time = DEFAULT_CACHE_LIFETIME;
        }
    }

    /// Drops service URLs equal to their derived default, leaving only the
    /// overrides. Inverse of [`ServerConfig::expand`].
    pub fn compact(&mut self) {
        if self.base_url.is_empty() {
            return;
        }
        let base = self.base_url.clone();
        for (slot, suffix) in self.service_urls_mut() {
            if slot.as_deref() == Some(format!("{base}{suffix}").as_str()) {
                *slot = None;
            }
        }
    }

    pub fn check_required(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::MissingNamespace);
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(())
    }

    pub fn is_required_field_empty(&self) -> bool {
        self.check_required().is_err()
    }

    /// Requires an absolute http(s) URL and strips trailing slashes.
    pub fn sanitize_base_url(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        let parsed =
            Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(self.base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        self.base_url = trimmed.to_owned();
        Ok(())
    }

    /// Lobby service URL, derived from the base URL when not overridden.
    pub fn lobby_url(&self) -> String {
        match self.lobby_server_url.as_deref() {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_owned(),
            _ => format!("{}/lobby", self.base_url),
        }
    }
}
