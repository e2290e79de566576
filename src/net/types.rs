//! Wire types for the chat REST API.
//!
//! Responses may carry more fields than listed here; serde ignores them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Account snapshot returned by `/api/auth/me/` and the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A chat message. Immutable once received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub username: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<FixedOffset>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339 timestamp, or one without an offset read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let naive = NAIVE_FORMATS.iter().find_map(|fmt| match NaiveDateTime::parse_from_str(raw, fmt) {
        Ok(naive) => Some(naive),
        Err(_) => None,
    })?;
    // A wall time skipped by a DST jump has no local reading; treat it as UTC.
    Some(match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.fixed_offset(),
        None => naive.and_utc().fixed_offset(),
    })
}

/// Body returned by register and login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewMessage<'a> {
    pub text: &'a str,
}

/// Error body shape used by the backend: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
