//! Per-view client state.
//!
//! DESIGN
//! ======
//! State is split by view (`auth`, `chat`, `profile`) so each controller is a
//! small plain struct. Controllers never talk to the network: `App` spawns
//! the request and feeds the result back through `finish_*` / `fail_*`.

pub mod auth;
pub mod chat;
pub mod profile;

use crate::net::api::ApiError;

pub const LOGIN_FAILED: &str = "Login failed. Check your details and try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const LOAD_MESSAGES_FAILED: &str = "Could not load messages.";
pub const SEND_FAILED: &str = "Could not send the message.";
pub const LOAD_PROFILE_FAILED: &str = "Could not load the profile.";

/// Inline text for a failed request: the server's detail, else `fallback`.
#[must_use]
pub fn error_message(error: &ApiError, fallback: &str) -> String {
    error.detail().unwrap_or(fallback).to_owned()
}
