#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, TimeZone};

use super::{LOAD_MESSAGES_FAILED, SEND_FAILED, error_message};
use crate::net::api::ApiError;
use crate::net::types::Message;

/// State for the chat room view.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    /// Messages in server order, newest last.
    pub messages: Vec<Message>,
    pub draft: String,
    pub loading: bool,
    pub sending: bool,
    pub error: Option<String>,
    /// Message the view is scrolled to. Follows the newest message whenever
    /// the list changes.
    pub scrolled_to: Option<i64>,
    /// Messages sent while a fetch was in flight. The fetch may have been
    /// answered before they were stored, so they survive its replacement.
    sent_during_fetch: Vec<Message>,
}

impl ChatState {
    /// State on mount: the initial fetch is already in flight.
    #[must_use]
    pub fn mounting() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Start a re-fetch of the full list. Ignored while one is in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.sent_during_fetch.clear();
        true
    }

    /// Replace the list with the fetched one, keeping messages sent after the
    /// fetch started that it does not already contain.
    pub fn finish_load(&mut self, mut messages: Vec<Message>) {
        for sent in self.sent_during_fetch.drain(..) {
            if !messages.iter().any(|m| m.id == sent.id) {
                messages.push(sent);
            }
        }
        self.messages = messages;
        self.loading = false;
        self.error = None;
        self.scroll_to_latest();
    }

    pub fn fail_load(&mut self, error: &ApiError) {
        self.loading = false;
        self.sent_during_fetch.clear();
        self.error = Some(error_message(error, LOAD_MESSAGES_FAILED));
    }

    /// The input is locked while a send is in flight.
    pub fn set_draft(&mut self, text: &str) -> bool {
        if self.sending {
            return false;
        }
        text.clone_into(&mut self.draft);
        true
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.sending && !self.draft.trim().is_empty()
    }

    /// Start a send and return the text to post. Whitespace-only drafts and
    /// submits during an in-flight send are ignored without touching state.
    pub fn begin_send(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        self.sending = true;
        Some(self.draft.clone())
    }

    /// Append the server's copy of the sent message and clear the input.
    pub fn finish_send(&mut self, message: Message) {
        if self.loading {
            self.sent_during_fetch.push(message.clone());
        }
        self.messages.push(message);
        self.draft.clear();
        self.sending = false;
        self.error = None;
        self.scroll_to_latest();
    }

    /// The draft is kept so the user can retry.
    pub fn fail_send(&mut self, error: &ApiError) {
        self.sending = false;
        self.error = Some(error_message(error, SEND_FAILED));
    }

    fn scroll_to_latest(&mut self) {
        self.scrolled_to = self.messages.last().map(|m| m.id);
    }
}

/// `HH:MM` time of day for `created_at` in `tz`, 24-hour and zero-padded.
#[must_use]
pub fn format_time<Tz>(created_at: &DateTime<FixedOffset>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created_at.with_timezone(tz).format("%H:%M").to_string()
}

/// `HH:MM` in the local time zone.
#[must_use]
pub fn local_time(created_at: &DateTime<FixedOffset>) -> String {
    format_time(created_at, &Local)
}
