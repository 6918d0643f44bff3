//! Runtime configuration, read from `PLANTBOT_*` environment variables.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::SecurityConfig;
use crate::db::StoreKind;
use crate::presence::{Avatars, DEFAULT_ALIVE_AVATAR, DEFAULT_DEAD_AVATAR};
use crate::time::{DurationError, Span};

pub const DEFAULT_TICK_INTERVAL: &str = "1h";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tick interval {value:?}: {source}")]
    Interval {
        value: String,
        #[source]
        source: DurationError,
    },

    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Application credential, sent with presence updates.
    pub token: Option<String>,
    /// Application identity on the chat platform.
    pub client_id: Option<String>,
    /// Deployment scope (the guild/server the bot serves).
    pub guild_id: Option<String>,
    pub tick_interval: Span,
    pub store: StoreKind,
    /// Record location; `None` means the backend's default path.
    pub data_path: Option<PathBuf>,
    pub presence_url: Option<String>,
    pub avatars: Avatars,
    pub security: SecurityConfig,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            client_id: None,
            guild_id: None,
            tick_interval: Span::from_millis(crate::time::HOUR),
            store: StoreKind::default(),
            data_path: None,
            presence_url: None,
            avatars: Avatars::default(),
            security: SecurityConfig::disabled(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let interval_text =
            get("PLANTBOT_TICK_INTERVAL").unwrap_or_else(|| DEFAULT_TICK_INTERVAL.to_string());
        let tick_interval = parse_interval(&interval_text)?;

        let store = match get("PLANTBOT_STORE") {
            Some(kind) => kind
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "PLANTBOT_STORE",
                    reason,
                })?,
            None => StoreKind::default(),
        };

        let port = match get("PLANTBOT_PORT") {
            Some(port) => port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "PLANTBOT_PORT",
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            token: get("PLANTBOT_TOKEN"),
            client_id: get("PLANTBOT_CLIENT_ID"),
            guild_id: get("PLANTBOT_GUILD_ID"),
            tick_interval,
            store,
            data_path: get("PLANTBOT_DATA").map(PathBuf::from),
            presence_url: get("PLANTBOT_PRESENCE_URL"),
            avatars: Avatars {
                alive: get("PLANTBOT_ALIVE_AVATAR")
                    .unwrap_or_else(|| DEFAULT_ALIVE_AVATAR.to_string()),
                dead: get("PLANTBOT_DEAD_AVATAR")
                    .unwrap_or_else(|| DEFAULT_DEAD_AVATAR.to_string()),
            },
            security: SecurityConfig::from_lookup(&lookup),
            port,
        })
    }

    /// Where the record lives, falling back to the backend default.
    pub fn resolved_data_path(&self) -> anyhow::Result<PathBuf> {
        match &self.data_path {
            Some(path) => Ok(path.clone()),
            None => self.store.default_path(),
        }
    }
}

/// Parse a tick interval, rejecting zero.
pub fn parse_interval(text: &str) -> Result<Span, ConfigError> {
    let span = Span::parse(text).map_err(|source| ConfigError::Interval {
        value: text.to_string(),
        source,
    })?;
    if span == Span::ZERO {
        return Err(ConfigError::ZeroInterval);
    }
    Ok(span)
}
