#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::{LOAD_PROFILE_FAILED, error_message};
use crate::net::api::ApiError;
use crate::net::types::User;

/// Read-only snapshot of the signed-in account, dropped with the view.
#[derive(Clone, Debug, Default)]
pub struct ProfileState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProfileState {
    #[must_use]
    pub fn mounting() -> Self {
        Self { loading: true, ..Self::default() }
    }

    pub fn finish_load(&mut self, user: User) {
        self.user = Some(user);
        self.loading = false;
        self.error = None;
    }

    pub fn fail_load(&mut self, error: &ApiError) {
        self.loading = false;
        self.error = Some(error_message(error, LOAD_PROFILE_FAILED));
    }

    /// Uppercased first character of the username.
    #[must_use]
    pub fn avatar_initial(&self) -> Option<char> {
        let first = self.user.as_ref()?.username.chars().next()?;
        first.to_uppercase().next()
    }
}
