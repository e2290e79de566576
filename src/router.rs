//! Client routes, navigation history and the auth gate.
//!
//! DESIGN
//! ======
//! Navigation happens in two steps, the way a browser router does it: the
//! target entry is pushed (or replaces the current one), then the gate runs.
//! A gate redirect always *replaces* the entry it rejected, so being bounced
//! to `/login` never adds a history entry of its own.
//!
//! The gate is advisory. It only checks that a credential is present; the
//! server decides whether it is valid.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use tracing::debug;

use crate::store::TokenStore;

/// Routes the client knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Register,
    Login,
    Chat,
    Profile,
    NotFound,
}

/// Routes announced to an external host at startup.
pub const CLIENT_ROUTES: [Route; 4] = [Route::Register, Route::Login, Route::Chat, Route::Profile];

impl Route {
    /// Parse a client path. A trailing slash and any query string are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Root,
            "/register" => Self::Register,
            "/login" => Self::Login,
            "/chat" => Self::Chat,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Register => "/register",
            Self::Login => "/login",
            Self::Chat => "/chat",
            Self::Profile => "/profile",
            Self::NotFound => "*",
        }
    }

    /// Routes that require a stored credential.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Chat | Self::Profile)
    }
}

// =============================================================================
// HISTORY
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavMode {
    Push,
    Replace,
}

/// Entries kept before the oldest are dropped.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    /// Append an entry, dropping the oldest ones past `HISTORY_LIMIT`.
    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
    }

    /// Replace the current entry, or start the history if it is empty.
    pub fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(current) => *current = route,
            None => self.entries.push(route),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.entries.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Route] {
        &self.entries
    }
}

// =============================================================================
// AUTH GATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Route),
    Redirect(Route),
}

/// Decide which route actually mounts for `target`.
#[must_use]
pub fn gate(target: Route, store: &dyn TokenStore) -> GateDecision {
    match target {
        Route::Root => GateDecision::Redirect(Route::Login),
        route if route.is_protected() && !store.is_authenticated() => GateDecision::Redirect(Route::Login),
        route => GateDecision::Allow(route),
    }
}

/// History plus gate. Returns the route that mounts.
#[derive(Clone, Debug, Default)]
pub struct Router {
    history: History,
}

impl Router {
    pub fn navigate(&mut self, target: Route, mode: NavMode, store: &dyn TokenStore) -> Route {
        match mode {
            NavMode::Push => self.history.push(target),
            NavMode::Replace => self.history.replace(target),
        }
        match gate(target, store) {
            GateDecision::Allow(route) => route,
            GateDecision::Redirect(route) => {
                debug!(from = target.path(), to = route.path(), "gate redirect");
                self.history.replace(route);
                route
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
}

// =============================================================================
// ROUTE ANNOUNCEMENT
// =============================================================================

/// External host notified with the client's route list at startup.
pub trait RouteObserver {
    fn routes_available(&self, routes: &[&'static str]);
}

/// Notify `observer`, if any, with every client route path.
pub fn announce_routes(observer: Option<&dyn RouteObserver>) {
    let Some(observer) = observer else {
        return;
    };
    let paths: Vec<&'static str> = CLIENT_ROUTES.iter().map(|route| route.path()).collect();
    observer.routes_available(&paths);
}
