#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::{LOGIN_FAILED, REGISTER_FAILED, error_message};
use crate::net::api::ApiError;

pub const MISSING_FIELDS: &str = "Enter a username and password.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn fallback_error(self) -> &'static str {
        match self {
            Self::Login => LOGIN_FAILED,
            Self::Register => REGISTER_FAILED,
        }
    }
}

/// Login / register form state.
#[derive(Clone, Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self { mode, username: String::new(), password: String::new(), error: None, loading: false }
    }

    /// Fill the form. Inputs are locked while a submit is in flight.
    pub fn set_credentials(&mut self, username: &str, password: &str) -> bool {
        if self.loading {
            return false;
        }
        username.clone_into(&mut self.username);
        password.clone_into(&mut self.password);
        true
    }

    /// Start a submit and return the credentials to send, or `None` if the
    /// submit is rejected (already in flight, or a field is empty).
    pub fn begin_submit(&mut self) -> Option<(String, String)> {
        if self.loading {
            return None;
        }
        self.error = None;
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_FIELDS.to_owned());
            return None;
        }
        self.loading = true;
        Some((self.username.clone(), self.password.clone()))
    }

    pub fn fail(&mut self, error: &ApiError) {
        self.loading = false;
        self.error = Some(error_message(error, self.mode.fallback_error()));
    }

    /// Submit failed before reaching the server (e.g. the credential could
    /// not be stored).
    pub fn fail_with(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_owned());
    }
}
