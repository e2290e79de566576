//! Application controller: owns the router, the mounted view and the session.
//!
//! DESIGN
//! ======
//! Actions never await the network. They spawn the request as a task and
//! return; the task reports back with a `Completion` on an mpsc channel that
//! the event loop feeds into `App::handle`. Controllers stay synchronous and
//! the terminal keeps accepting input while a request is in flight.
//!
//! LIFECYCLE
//! =========
//! 1. Navigate → router + auth gate pick the route → epoch bumps → view mounts
//! 2. Mounting chat or profile spawns its initial fetch, tagged with the epoch
//! 3. Completion arrives → dropped if its epoch is stale (view unmounted)
//! 4. Otherwise applied: view update, or the shared failure protocol
//!
//! FAILURE PROTOCOL
//! ================
//! Authenticated calls that fail with 401 navigate to `/login`. The stored
//! credential is left alone; only an explicit logout clears it. Any other
//! failure becomes an inline error and leaves the view's data as it was.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::net::api::{ApiError, ChatApi};
use crate::net::types::{AuthResponse, Message, User};
use crate::router::{History, NavMode, Route, Router};
use crate::state::auth::{AuthForm, AuthMode};
use crate::state::chat::ChatState;
use crate::state::profile::ProfileState;
use crate::store::TokenStore;

pub const SESSION_SAVE_FAILED: &str = "Signed in, but the session could not be saved.";

/// The mounted view and its local state.
#[derive(Clone, Debug)]
pub enum View {
    Login(AuthForm),
    Register(AuthForm),
    Chat(ChatState),
    Profile(ProfileState),
    NotFound,
}

/// Result of a spawned request, tagged with the epoch it was started in.
#[derive(Debug)]
pub struct Completion {
    epoch: u64,
    kind: CompletionKind,
}

#[derive(Debug)]
enum CompletionKind {
    Auth(AuthMode, Result<AuthResponse, ApiError>),
    Messages(Result<Vec<Message>, ApiError>),
    Sent(Result<Message, ApiError>),
    Profile(Result<User, ApiError>),
}

impl Completion {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

pub struct App {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn TokenStore>,
    router: Router,
    view: View,
    epoch: u64,
    tx: mpsc::UnboundedSender<Completion>,
}

impl App {
    /// Build the app and mount `start`. Must be called inside a tokio runtime
    /// because mounting a data view spawns its fetch.
    pub fn new(
        api: Arc<dyn ChatApi>,
        store: Arc<dyn TokenStore>,
        start: Route,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = Self { api, store, router: Router::default(), view: View::NotFound, epoch: 0, tx };
        app.navigate(start, NavMode::Replace);
        (app, rx)
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.router.current().unwrap_or(Route::NotFound)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        self.router.history()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Navigate to `target`, pushing a history entry.
    pub fn open(&mut self, target: Route) {
        self.navigate(target, NavMode::Push);
    }

    fn navigate(&mut self, target: Route, mode: NavMode) {
        let route = self.router.navigate(target, mode, self.store.as_ref());
        self.epoch = self.epoch.wrapping_add(1);
        info!(path = route.path(), epoch = self.epoch, "mount view");

        self.view = match route {
            Route::Login => View::Login(AuthForm::new(AuthMode::Login)),
            Route::Register => View::Register(AuthForm::new(AuthMode::Register)),
            Route::Chat => {
                self.spawn(|api| async move { api.messages().await }, CompletionKind::Messages);
                View::Chat(ChatState::mounting())
            }
            Route::Profile => {
                self.spawn(|api| async move { api.current_user().await }, CompletionKind::Profile);
                View::Profile(ProfileState::mounting())
            }
            Route::Root | Route::NotFound => View::NotFound,
        };
    }

    /// Clear the credential and return to login.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove() {
            error!(error = %e, "failed to clear stored credential");
        }
        info!("logged out");
        self.navigate(Route::Login, NavMode::Push);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Fill the login/register form. Returns `false` if no form is mounted
    /// or its inputs are locked.
    pub fn set_credentials(&mut self, username: &str, password: &str) -> bool {
        match &mut self.view {
            View::Login(form) | View::Register(form) => form.set_credentials(username, password),
            _ => false,
        }
    }

    /// Submit the mounted login/register form.
    pub fn submit_auth(&mut self) -> bool {
        let (View::Login(form) | View::Register(form)) = &mut self.view else {
            return false;
        };
        let mode = form.mode;
        let Some((username, password)) = form.begin_submit() else {
            return false;
        };
        debug!(?mode, %username, "submitting credentials");
        self.spawn(
            move |api| async move {
                match mode {
                    AuthMode::Login => api.login(&username, &password).await,
                    AuthMode::Register => api.register(&username, &password).await,
                }
            },
            move |result| CompletionKind::Auth(mode, result),
        );
        true
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        match &mut self.view {
            View::Chat(chat) => chat.set_draft(text),
            _ => false,
        }
    }

    /// Send the chat draft. Ignored while a send is in flight or when the
    /// draft is blank.
    pub fn submit_message(&mut self) -> bool {
        let View::Chat(chat) = &mut self.view else {
            return false;
        };
        let Some(text) = chat.begin_send() else {
            return false;
        };
        self.spawn(move |api| async move { api.send_message(&text).await }, CompletionKind::Sent);
        true
    }

    /// Re-fetch the message list.
    pub fn refresh(&mut self) -> bool {
        let View::Chat(chat) = &mut self.view else {
            return false;
        };
        if !chat.begin_refresh() {
            return false;
        }
        self.spawn(|api| async move { api.messages().await }, CompletionKind::Messages);
        true
    }

    fn spawn<T, F, Fut, W>(&self, call: F, wrap: W)
    where
        F: FnOnce(Arc<dyn ChatApi>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        W: FnOnce(Result<T, ApiError>) -> CompletionKind + Send + 'static,
        T: Send + 'static,
    {
        let request = call(Arc::clone(&self.api));
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let kind = wrap(request.await);
            if tx.send(Completion { epoch, kind }).is_err() {
                debug!(epoch, "app gone before request finished");
            }
        });
    }

    // =========================================================================
    // COMPLETIONS
    // =========================================================================

    /// Apply a finished request. Completions from an unmounted view are dropped.
    pub fn handle(&mut self, completion: Completion) {
        if completion.epoch != self.epoch {
            debug!(stale = completion.epoch, current = self.epoch, "dropping completion for unmounted view");
            return;
        }
        match completion.kind {
            CompletionKind::Auth(mode, result) => self.on_auth(mode, result),
            CompletionKind::Messages(result) => self.on_messages(result),
            CompletionKind::Sent(result) => self.on_sent(result),
            CompletionKind::Profile(result) => self.on_profile(result),
        }
    }

    fn on_auth(&mut self, mode: AuthMode, result: Result<AuthResponse, ApiError>) {
        let (View::Login(form) | View::Register(form)) = &mut self.view else {
            return;
        };
        match result {
            Ok(response) => {
                if let Err(e) = self.store.save(&response.token) {
                    error!(error = %e, "failed to store credential");
                    form.fail_with(SESSION_SAVE_FAILED);
                    return;
                }
                info!(?mode, user = response.user.as_ref().map(|u| u.username.as_str()), "signed in");
                self.navigate(Route::Chat, NavMode::Push);
            }
            Err(e) => {
                warn!(?mode, error = %e, "authentication failed");
                form.fail(&e);
            }
        }
    }

    fn on_messages(&mut self, result: Result<Vec<Message>, ApiError>) {
        match result {
            Ok(messages) => {
                if let View::Chat(chat) = &mut self.view {
                    debug!(count = messages.len(), "messages loaded");
                    chat.finish_load(messages);
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to load messages");
                if self.redirect_if_unauthorized(&e) {
                    return;
                }
                if let View::Chat(chat) = &mut self.view {
                    chat.fail_load(&e);
                }
            }
        }
    }

    fn on_sent(&mut self, result: Result<Message, ApiError>) {
        match result {
            Ok(message) => {
                if let View::Chat(chat) = &mut self.view {
                    debug!(id = message.id, "message sent");
                    chat.finish_send(message);
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to send message");
                if self.redirect_if_unauthorized(&e) {
                    return;
                }
                if let View::Chat(chat) = &mut self.view {
                    chat.fail_send(&e);
                }
            }
        }
    }

    fn on_profile(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                if let View::Profile(profile) = &mut self.view {
                    profile.finish_load(user);
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to load profile");
                if self.redirect_if_unauthorized(&e) {
                    return;
                }
                if let View::Profile(profile) = &mut self.view {
                    profile.fail_load(&e);
                }
            }
        }
    }

    /// 401 sends the user to login. The credential is kept.
    fn redirect_if_unauthorized(&mut self, error: &ApiError) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        info!("server rejected credential; redirecting to login");
        self.navigate(Route::Login, NavMode::Push);
        true
    }
}
