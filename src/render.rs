//! Text rendering of the mounted view for the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Display;

use chrono::{Local, TimeZone};

use crate::app::View;
use crate::state::auth::{AuthForm, AuthMode};
use crate::state::chat::{ChatState, format_time};
use crate::state::profile::ProfileState;

/// Messages shown at once; older ones scroll off the top.
pub const CHAT_WINDOW: usize = 50;

pub const LOADING_MESSAGES: &str = "Loading messages...";
pub const NO_MESSAGES: &str = "No messages yet. Start the conversation!";

/// Render `view` with timestamps in the local time zone.
#[must_use]
pub fn render(view: &View) -> Vec<String> {
    render_in(view, &Local)
}

#[must_use]
pub fn render_in<Tz>(view: &View, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match view {
        View::Login(form) | View::Register(form) => render_form(form),
        View::Chat(chat) => render_chat(chat, tz),
        View::Profile(profile) => render_profile(profile),
        View::NotFound => vec!["Page not found.".to_owned(), "Try /go /login".to_owned()],
    }
}

fn render_form(form: &AuthForm) -> Vec<String> {
    let (title, usage, switch) = match form.mode {
        AuthMode::Login => ("== Sign in ==", "/login <username> <password>", "No account? /register <username> <password>"),
        AuthMode::Register => ("== Register ==", "/register <username> <password>", "Have an account? /go /login"),
    };
    let mut lines = vec![title.to_owned()];
    if let Some(error) = &form.error {
        lines.push(format!("! {error}"));
    }
    if form.loading {
        lines.push("Please wait...".to_owned());
    } else {
        lines.push(usage.to_owned());
        lines.push(switch.to_owned());
    }
    lines
}

fn render_chat<Tz>(chat: &ChatState, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec!["== Chat ==  (/profile, /refresh)".to_owned()];

    if chat.loading && chat.messages.is_empty() {
        lines.push(LOADING_MESSAGES.to_owned());
    } else if chat.messages.is_empty() {
        lines.push(NO_MESSAGES.to_owned());
    } else {
        let end = chat
            .scrolled_to
            .and_then(|id| chat.messages.iter().position(|m| m.id == id))
            .map_or(chat.messages.len(), |index| index + 1);
        let start = end.saturating_sub(CHAT_WINDOW);
        for message in &chat.messages[start..end] {
            lines.push(format!("[{}] {}: {}", format_time(&message.created_at, tz), message.username, message.text));
        }
    }

    if let Some(error) = &chat.error {
        lines.push(format!("! {error}"));
    }
    if chat.sending {
        lines.push(format!("> {}  (sending...)", chat.draft));
    } else if !chat.draft.is_empty() {
        lines.push(format!("> {}", chat.draft));
    }
    lines
}

fn render_profile(profile: &ProfileState) -> Vec<String> {
    let mut lines = vec!["== Profile ==".to_owned()];
    if profile.loading {
        lines.push("Loading...".to_owned());
        return lines;
    }
    if let Some(user) = &profile.user {
        if let Some(initial) = profile.avatar_initial() {
            lines.push(format!("[{initial}]"));
        }
        lines.push(format!("Username: {}", user.username));
        lines.push(format!("User ID: {}", user.id));
    }
    if let Some(error) = &profile.error {
        lines.push(format!("! {error}"));
    }
    lines.push("/chat to go back, /logout to sign out".to_owned());
    lines
}
