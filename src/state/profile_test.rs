use super::*;

fn user(name: &str) -> User {
    User { id: 42, username: name.to_owned() }
}

#[test]
fn mounting_starts_loading_without_user() {
    let state = ProfileState::mounting();
    assert!(state.loading);
    assert!(state.user.is_none());
}

#[test]
fn finish_load_stores_user() {
    let mut state = ProfileState::mounting();
    state.finish_load(user("alice"));
    assert_eq!(state.user, Some(user("alice")));
    assert!(!state.loading);
}

#[test]
fn fail_load_shows_detail_or_fallback() {
    let mut state = ProfileState::mounting();
    state.fail_load(&ApiError::Http { status: 500, detail: Some("boom".to_owned()) });
    assert_eq!(state.error.as_deref(), Some("boom"));

    let mut state = ProfileState::mounting();
    state.fail_load(&ApiError::Http { status: 500, detail: None });
    assert_eq!(state.error.as_deref(), Some(LOAD_PROFILE_FAILED));
}

#[test]
fn avatar_initial_is_uppercased_first_char() {
    let mut state = ProfileState::mounting();
    assert_eq!(state.avatar_initial(), None);
    state.finish_load(user("élodie"));
    assert_eq!(state.avatar_initial(), Some('É'));
}

#[test]
fn avatar_initial_empty_username_is_none() {
    let mut state = ProfileState::mounting();
    state.finish_load(user(""));
    assert_eq!(state.avatar_initial(), None);
}
