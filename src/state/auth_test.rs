use super::*;

fn http(status: u16, detail: Option<&str>) -> ApiError {
    ApiError::Http { status, detail: detail.map(ToOwned::to_owned) }
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn new_form_is_idle_and_empty() {
    let form = AuthForm::new(AuthMode::Login);
    assert!(form.username.is_empty());
    assert!(form.password.is_empty());
    assert!(form.error.is_none());
    assert!(!form.loading);
}

// =============================================================================
// Submit guard
// =============================================================================

#[test]
fn begin_submit_returns_credentials_and_sets_loading() {
    let mut form = AuthForm::new(AuthMode::Login);
    form.set_credentials("alice", "secret");
    assert_eq!(form.begin_submit(), Some(("alice".to_owned(), "secret".to_owned())));
    assert!(form.loading);
}

#[test]
fn begin_submit_ignored_while_loading() {
    let mut form = AuthForm::new(AuthMode::Login);
    form.set_credentials("alice", "secret");
    form.begin_submit();
    assert_eq!(form.begin_submit(), None);
}

#[test]
fn inputs_locked_while_loading() {
    let mut form = AuthForm::new(AuthMode::Login);
    form.set_credentials("alice", "secret");
    form.begin_submit();
    assert!(!form.set_credentials("mallory", "x"));
    assert_eq!(form.username, "alice");
}

#[test]
fn begin_submit_rejects_missing_fields() {
    let mut form = AuthForm::new(AuthMode::Register);
    form.set_credentials("  ", "pw");
    assert_eq!(form.begin_submit(), None);
    assert_eq!(form.error.as_deref(), Some(MISSING_FIELDS));
    assert!(!form.loading);
}

#[test]
fn begin_submit_clears_previous_error() {
    let mut form = AuthForm::new(AuthMode::Login);
    form.error = Some("old".to_owned());
    form.set_credentials("alice", "secret");
    form.begin_submit();
    assert!(form.error.is_none());
}

// =============================================================================
// Failure messages
// =============================================================================

#[test]
fn fail_uses_server_detail() {
    let mut form = AuthForm::new(AuthMode::Login);
    form.set_credentials("alice", "bad");
    form.begin_submit();
    form.fail(&http(400, Some("Invalid credentials.")));
    assert_eq!(form.error.as_deref(), Some("Invalid credentials."));
    assert!(!form.loading);
}

#[test]
fn fail_without_detail_uses_mode_fallback() {
    let mut login = AuthForm::new(AuthMode::Login);
    login.fail(&http(500, None));
    assert_eq!(login.error.as_deref(), Some(LOGIN_FAILED));

    let mut register = AuthForm::new(AuthMode::Register);
    register.fail(&http(500, None));
    assert_eq!(register.error.as_deref(), Some(REGISTER_FAILED));
}
