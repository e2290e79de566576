//! Client configuration parsed from environment variables.
//!
//! `ClientConfig::from_env` reads the process environment; `from_lookup`
//! takes any key lookup so tests never have to mutate shared env state.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const APP_DIR: &str = "chatroom";
const TOKEN_FILE_NAME: &str = "session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// File holding the persisted session credential.
    pub token_file: PathBuf,
    pub connect_timeout: Duration,
    /// Fallback `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_API_URL`: default `http://127.0.0.1:8000`
    /// - `CHAT_TOKEN_FILE`: default `$XDG_STATE_HOME/chatroom/session.json`,
    ///   then `$HOME/.local/state/chatroom/session.json`
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CHAT_LOG`: default `warn`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = normalize_api_url(non_empty(lookup("CHAT_API_URL")).as_deref().unwrap_or(DEFAULT_API_URL))?;
        let token_file = match non_empty(lookup("CHAT_TOKEN_FILE")) {
            Some(path) => PathBuf::from(path),
            None => default_token_file(&lookup),
        };
        let connect_timeout = Duration::from_secs(parse_u64(
            lookup("CHAT_CONNECT_TIMEOUT_SECS").as_deref(),
            DEFAULT_CONNECT_TIMEOUT_SECS,
        ));
        let log_level = non_empty(lookup("CHAT_LOG")).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

        Ok(Self { api_url, token_file, connect_timeout, log_level })
    }

    /// Replace the backend URL, applying the same validation as `from_env`.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(raw)?;
        Ok(self)
    }
}

pub(crate) fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "CHAT_API_URL",
            message: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(trimmed.to_owned())
}

fn default_token_file<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let state_dir = match (non_empty(lookup("XDG_STATE_HOME")), non_empty(lookup("HOME"))) {
        (Some(state), _) => PathBuf::from(state),
        (None, Some(home)) => PathBuf::from(home).join(".local").join("state"),
        (None, None) => PathBuf::from("."),
    };
    state_dir.join(APP_DIR).join(TOKEN_FILE_NAME)
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::trim).map(str::parse::<u64>) {
        Some(Ok(value)) => value,
        _ => default,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_lookup(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}
