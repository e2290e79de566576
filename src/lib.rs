//! # chatroom
//!
//! Terminal client for a token-authenticated chat room REST API.
//!
//! The crate holds the session credential lifecycle (`store`), the REST
//! client (`net`), routing with the auth gate (`router`), per-view state
//! (`state`), and the `app` controller that ties them together. `render` and
//! `console` are the terminal front-end used by the `chatroom` binary.

pub mod app;
pub mod config;
pub mod console;
pub mod net;
pub mod render;
pub mod router;
pub mod state;
pub mod store;
