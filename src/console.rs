//! Terminal input: parse a line into a command and apply it to the app.

#[cfg(test)]
#[path = "console_test.rs"]
mod console_test;

use crate::app::{App, View};
use crate::router::Route;

pub const HELP: &str = "\
/go <path>                   open /login, /register, /chat or /profile
/login <username> <password> sign in
/register <username> <password> create an account
/refresh                     reload the chat
/profile, /chat              switch views
/logout                      sign out
/quit                        exit
anything else in /chat is sent as a message";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Go(Route),
    Login { username: String, password: String },
    Register { username: String, password: String },
    Refresh,
    Logout,
    Help,
    Quit,
    Say(String),
    Empty,
    Invalid(String),
}

/// What the event loop should do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Notice(String),
    Quit,
}

#[must_use]
pub fn parse(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Say(line.to_owned());
    };
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    match name {
        "go" if !args.is_empty() => Command::Go(Route::parse(args)),
        "go" => Command::Invalid("usage: /go <path>".to_owned()),
        "login" | "register" => match credentials(args) {
            Some((username, password)) if name == "login" => Command::Login { username, password },
            Some((username, password)) => Command::Register { username, password },
            None => Command::Invalid(format!("usage: /{name} <username> <password>")),
        },
        "chat" => Command::Go(Route::Chat),
        "profile" => Command::Go(Route::Profile),
        "refresh" => Command::Refresh,
        "logout" => Command::Logout,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command /{other}; try /help")),
    }
}

/// The password is everything after the username, so it may contain spaces.
fn credentials(args: &str) -> Option<(String, String)> {
    let (username, password) = args.split_once(char::is_whitespace)?;
    let password = password.trim_start();
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username.to_owned(), password.to_owned()))
}

pub fn apply(app: &mut App, command: Command) -> Flow {
    match command {
        Command::Empty => Flow::Continue,
        Command::Quit => Flow::Quit,
        Command::Help => Flow::Notice(HELP.to_owned()),
        Command::Invalid(message) => Flow::Notice(message),
        Command::Go(route) => {
            app.open(route);
            Flow::Continue
        }
        Command::Login { username, password } => submit_form(app, Route::Login, &username, &password),
        Command::Register { username, password } => submit_form(app, Route::Register, &username, &password),
        Command::Refresh => {
            if matches!(app.view(), View::Chat(_)) {
                app.refresh();
                Flow::Continue
            } else {
                Flow::Notice("/refresh only works in the chat".to_owned())
            }
        }
        Command::Logout => {
            app.logout();
            Flow::Continue
        }
        Command::Say(text) => {
            if !matches!(app.view(), View::Chat(_)) {
                return Flow::Notice("Messages can only be sent from /chat; try /help".to_owned());
            }
            if app.set_draft(&text) {
                app.submit_message();
                Flow::Continue
            } else {
                Flow::Notice("Still sending the previous message".to_owned())
            }
        }
    }
}

/// Mount the form for `route` if needed, fill it and submit.
fn submit_form(app: &mut App, route: Route, username: &str, password: &str) -> Flow {
    if app.route() != route {
        app.open(route);
    }
    if !app.set_credentials(username, password) {
        return Flow::Notice("Please wait for the current request".to_owned());
    }
    app.submit_auth();
    Flow::Continue
}
