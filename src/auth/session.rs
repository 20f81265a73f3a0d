//! Explicit admin session context.
//!
//! Handlers receive an [`AuthSession`] instead of reading cookies
//! themselves. It is initialised once per request from the persisted
//! `session` cookie and torn down on logout.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "session";

/// Admin session token, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
}

impl AuthSession {
    /// Read the persisted token from the request cookies.
    #[must_use]
    pub fn init(jar: &CookieJar) -> Self {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|v| !v.is_empty());
        Self { token }
    }

    /// Session for a freshly issued token.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    /// Anonymous session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `Cookie` header value forwarded to the REST API.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("{SESSION_COOKIE}={t}"))
    }

    /// Store the token in `jar` so later requests can `init` from it.
    #[must_use]
    pub fn persist(&self, jar: CookieJar) -> CookieJar {
        match &self.token {
            Some(token) => jar.add(
                Cookie::build((SESSION_COOKIE, token.clone()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Strict),
            ),
            None => jar,
        }
    }

    /// Clear the token and remove the cookie from `jar`.
    #[must_use]
    pub fn teardown(&mut self, jar: CookieJar) -> CookieJar {
        self.token = None;
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}
