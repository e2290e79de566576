use chrono::{FixedOffset, Utc};

use super::*;

fn message(id: i64, text: &str) -> Message {
    Message {
        id,
        username: "a".to_owned(),
        text: text.to_owned(),
        created_at: DateTime::parse_from_rfc3339("2024-03-05T09:07:00Z").unwrap(),
    }
}

fn loaded(messages: Vec<Message>) -> ChatState {
    let mut state = ChatState::mounting();
    state.finish_load(messages);
    state
}

// =============================================================================
// Load
// =============================================================================

#[test]
fn chat_state_default_empty_messages() {
    let state = ChatState::default();
    assert!(state.messages.is_empty());
    assert!(!state.loading);
}

#[test]
fn mounting_starts_loading() {
    assert!(ChatState::mounting().loading);
}

#[test]
fn finish_load_replaces_list_and_scrolls_to_newest() {
    let mut state = loaded(vec![message(1, "old")]);
    state.begin_refresh();
    state.finish_load(vec![message(4, "x"), message(5, "y")]);
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.scrolled_to, Some(5));
    assert!(!state.loading);
}

#[test]
fn refresh_ignored_while_loading() {
    let mut state = ChatState::mounting();
    assert!(!state.begin_refresh());
}

#[test]
fn fail_load_keeps_previous_messages() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.begin_refresh();
    state.fail_load(&ApiError::Http { status: 500, detail: Some("boom".to_owned()) });
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.error.as_deref(), Some("boom"));
    assert!(!state.loading);
}

#[test]
fn finish_load_keeps_message_sent_during_refresh() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.set_draft("yo");
    state.begin_send();
    assert!(state.begin_refresh());
    state.finish_send(message(2, "yo"));
    state.finish_load(vec![message(1, "hi")]);
    let ids: Vec<i64> = state.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(state.scrolled_to, Some(2));
}

#[test]
fn finish_load_does_not_duplicate_sent_message_already_fetched() {
    let mut state = ChatState::mounting();
    state.set_draft("yo");
    state.begin_send();
    state.finish_send(message(2, "yo"));
    state.finish_load(vec![message(1, "hi"), message(2, "yo")]);
    let ids: Vec<i64> = state.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn messages_sent_before_a_refresh_are_not_carried_into_it() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.set_draft("yo");
    state.begin_send();
    state.finish_send(message(2, "yo"));
    state.begin_refresh();
    state.finish_load(vec![message(1, "hi")]);
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn fail_load_without_detail_uses_fallback() {
    let mut state = ChatState::mounting();
    state.fail_load(&ApiError::Http { status: 503, detail: None });
    assert_eq!(state.error.as_deref(), Some(LOAD_MESSAGES_FAILED));
}

// =============================================================================
// Send
// =============================================================================

#[test]
fn whitespace_draft_is_not_sent() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.set_draft("   \t ");
    assert!(!state.can_send());
    assert_eq!(state.begin_send(), None);
    assert!(!state.sending);
    assert_eq!(state.draft, "   \t ");
}

#[test]
fn begin_send_sets_sending_and_keeps_draft() {
    let mut state = loaded(vec![]);
    state.set_draft("yo");
    assert_eq!(state.begin_send().as_deref(), Some("yo"));
    assert!(state.sending);
    assert_eq!(state.draft, "yo");
}

#[test]
fn second_send_ignored_while_in_flight() {
    let mut state = loaded(vec![]);
    state.set_draft("yo");
    state.begin_send();
    assert_eq!(state.begin_send(), None);
    assert!(!state.set_draft("changed"));
}

#[test]
fn finish_send_appends_server_copy_and_clears_draft() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.set_draft("yo  ");
    state.begin_send();
    state.finish_send(message(2, "yo"));
    let texts: Vec<&str> = state.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["hi", "yo"]);
    assert!(state.draft.is_empty());
    assert!(!state.sending);
    assert_eq!(state.scrolled_to, Some(2));
}

#[test]
fn fail_send_keeps_draft_and_list() {
    let mut state = loaded(vec![message(1, "hi")]);
    state.set_draft("yo");
    state.begin_send();
    state.fail_send(&ApiError::Http { status: 400, detail: None });
    assert_eq!(state.draft, "yo");
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.error.as_deref(), Some(SEND_FAILED));
    assert!(!state.sending);
}

// =============================================================================
// Time formatting
// =============================================================================

#[test]
fn format_time_is_zero_padded_24_hour() {
    let ts = DateTime::parse_from_rfc3339("2024-03-05T09:07:00Z").unwrap();
    assert_eq!(format_time(&ts, &Utc), "09:07");

    let evening = DateTime::parse_from_rfc3339("2024-03-05T21:45:59Z").unwrap();
    assert_eq!(format_time(&evening, &Utc), "21:45");
}

#[test]
fn format_time_converts_to_viewer_zone() {
    let ts = DateTime::parse_from_rfc3339("2024-03-05T22:30:00Z").unwrap();
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
    assert_eq!(format_time(&ts, &plus_three), "01:30");
}
