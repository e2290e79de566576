//! REST API client for the chat backend.
//!
//! Every call is a single request awaited by its caller: no retry and no
//! cancellation. Authenticated endpoints get an `Authorization: Token <value>`
//! header built from whatever the token store holds at call time.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Http` carrying the status and the
//! server's `detail` string when the body has one, so views can branch on
//! 401 and show the server's message for everything else.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{AuthResponse, Credentials, ErrorBody, Message, NewMessage, User};
use crate::config::ClientConfig;
use crate::store::TokenStore;

/// Credential scheme used for every authenticated endpoint.
pub const AUTH_SCHEME: &str = "Token";

pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const ME_PATH: &str = "/api/auth/me/";
pub const MESSAGES_PATH: &str = "/api/messages/";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-provided detail message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Operations the views need from the backend.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn messages(&self) -> Result<Vec<Message>, ApiError>;
    async fn send_message(&self, text: &str) -> Result<Message, ApiError>;
}

/// Header value for a stored credential.
#[must_use]
pub fn authorization_value(token: &str) -> String {
    format!("{AUTH_SCHEME} {token}")
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>, connect_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().connect_timeout(connect_timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), store })
    }

    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(&config.api_url, store, config.connect_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    /// Attach the stored credential. With nothing stored the header is left
    /// off and the server's 401 drives the redirect.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.get() {
            Some(token) => builder.header(AUTHORIZATION, authorization_value(&token)),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%method, path, status = status.as_u16(), bytes = body.len(), "api response");

        if !status.is_success() {
            return Err(ApiError::Http { status: status.as_u16(), detail: error_detail(&body) });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn error_detail(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail.filter(|d| !d.trim().is_empty()),
        Err(_) => None,
    }
}

#[async_trait]
impl ChatApi for ApiClient {
    async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, REGISTER_PATH).json(&Credentials { username, password });
        self.execute(&Method::POST, REGISTER_PATH, builder).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, LOGIN_PATH).json(&Credentials { username, password });
        self.execute(&Method::POST, LOGIN_PATH, builder).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let builder = self.authorized(self.request(Method::GET, ME_PATH));
        self.execute(&Method::GET, ME_PATH, builder).await
    }

    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        let builder = self.authorized(self.request(Method::GET, MESSAGES_PATH));
        self.execute(&Method::GET, MESSAGES_PATH, builder).await
    }

    async fn send_message(&self, text: &str) -> Result<Message, ApiError> {
        let builder = self.authorized(self.request(Method::POST, MESSAGES_PATH)).json(&NewMessage { text });
        self.execute(&Method::POST, MESSAGES_PATH, builder).await
    }
}
