//! HTTP client for the back-office REST API.

use std::marker::PhantomData;

use axum_extra::extract::cookie::Cookie;
use reqwest::{Method, RequestBuilder, header};
use serde::Serialize;
use url::Url;

use super::error::{ApiError, Result};
use super::models::{
    ApiMessage, DashboardOverview, Events, Inquiries, Inquiry, PromotionalEvent, Resource, Role,
    StatusCount, User, UserList, UserSummary, Validate,
};
use crate::auth::{AuthSession, SESSION_COOKIE};

/// Client for the REST API.
///
/// # Example
///
/// ```rust,no_run
/// use ai_solution_site::api::{ApiClient, Articles};
/// use ai_solution_site::auth::AuthSession;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new("http://127.0.0.1:5000")?;
/// let auth = AuthSession::anonymous();
///
/// let articles = client.resource::<Articles>(&auth).list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Session carrying the issued token.
    pub session: AuthSession,
    /// Signed-in user, when the API reports it.
    pub user: Option<UserSummary>,
}

#[derive(Debug, serde::Deserialize)]
struct LoginBody {
    #[serde(default)]
    user: Option<UserSummary>,
    #[serde(default)]
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the REST API (e.g. "http://127.0.0.1:5000").
    ///   A path prefix is kept: `http://host/backend` serves
    ///   `http://host/backend/api/...`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let dir = format!("{}/", base_url.path());
            base_url.set_path(&dir);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access a CRUD collection.
    pub fn resource<'a, R: Resource>(&'a self, auth: &'a AuthSession) -> ResourceApi<'a, R> {
        ResourceApi {
            client: self,
            auth,
            _resource: PhantomData,
        }
    }

    /// Access user management.
    pub fn users<'a>(&'a self, auth: &'a AuthSession) -> UsersApi<'a> {
        UsersApi { client: self, auth }
    }

    /// Access dashboard statistics.
    pub fn dashboard<'a>(&'a self, auth: &'a AuthSession) -> DashboardApi<'a> {
        DashboardApi { client: self, auth }
    }

    /// Sign in and capture the issued session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        if username.trim().is_empty() {
            return Err(ApiError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(ApiError::MissingField("password"));
        }

        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .http
            .post(self.url("/api/login")?)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let cookie_token = session_cookie(&response);
        let body: LoginBody = Self::handle_response(response).await?;

        let token = body.token.or(cookie_token).ok_or(ApiError::MissingSession)?;
        Ok(LoginOutcome {
            session: AuthSession::from_token(token),
            user: body.user,
        })
    }

    /// End the session on the API side.
    pub async fn logout(&self, auth: &AuthSession) -> Result<ApiMessage> {
        let response = self
            .request(Method::POST, "/api/logout", auth)?
            .send()
            .await?;
        Self::handle_response(response).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str, auth: &AuthSession) -> Result<RequestBuilder> {
        let mut builder = self.http.request(method, self.url(path)?);
        if let Some(cookie) = auth.cookie_header() {
            builder = builder.header(header::COOKIE, cookie);
        }
        Ok(builder)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            })
        }
    }
}

/// Pull `session=` out of the response's `Set-Cookie` headers.
fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| Cookie::parse(v).ok())
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// The API reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(ToString::to_string))
        .unwrap_or_else(|| body.to_string())
}

// =============================================================================
// CRUD collections
// =============================================================================

/// Generic CRUD accessor for one [`Resource`].
#[derive(Debug)]
pub struct ResourceApi<'a, R> {
    client: &'a ApiClient,
    auth: &'a AuthSession,
    _resource: PhantomData<R>,
}

impl<R: Resource> ResourceApi<'_, R> {
    /// List every record.
    pub async fn list(&self) -> Result<Vec<R::Record>> {
        self.list_with_query(&[]).await
    }

    /// Fetch one record.
    pub async fn get(&self, id: i64) -> Result<R::Record> {
        let response = self
            .client
            .request(Method::GET, &format!("{}/{id}", R::PATH), self.auth)?
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }

    /// Create a record after required-field checks.
    pub async fn create(&self, draft: &R::Draft) -> Result<ApiMessage> {
        draft.validate()?;
        self.send_json(Method::POST, R::PATH.to_string(), draft).await
    }

    /// Replace a record's editable fields after required-field checks.
    pub async fn update(&self, id: i64, draft: &R::Draft) -> Result<ApiMessage> {
        draft.validate()?;
        self.send_json(Method::PUT, format!("{}/{id}", R::PATH), draft)
            .await
    }

    /// Remove a record.
    pub async fn delete(&self, id: i64) -> Result<ApiMessage> {
        let response = self
            .client
            .request(Method::DELETE, &format!("{}/{id}", R::PATH), self.auth)?
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }

    async fn list_with_query(&self, query: &[(&str, &str)]) -> Result<Vec<R::Record>> {
        let response = self
            .client
            .request(Method::GET, R::PATH, self.auth)?
            .query(query)
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: String,
        body: &B,
    ) -> Result<ApiMessage> {
        let response = self
            .client
            .request(method, &path, self.auth)?
            .json(body)
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }
}

impl ResourceApi<'_, Events> {
    /// Only events still flagged as upcoming.
    pub async fn list_upcoming(&self) -> Result<Vec<PromotionalEvent>> {
        self.list_with_query(&[("filter", "true")]).await
    }
}

impl ResourceApi<'_, Inquiries> {
    /// Inquiries in one workflow status (e.g. `Pending`).
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Inquiry>> {
        self.list_with_query(&[("status", status)]).await
    }

    /// Move an inquiry to another status.
    pub async fn set_status(&self, id: i64, status: &str) -> Result<ApiMessage> {
        if status.trim().is_empty() {
            return Err(ApiError::MissingField("status"));
        }
        let body = serde_json::json!({ "status": status });
        self.send_json(Method::PUT, format!("{}/{id}", Inquiries::PATH), &body)
            .await
    }
}

// =============================================================================
// Users
// =============================================================================

/// User management accessor.
#[derive(Debug)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
    auth: &'a AuthSession,
}

impl UsersApi<'_> {
    /// List accounts (admin only).
    pub async fn list(&self) -> Result<Vec<User>> {
        let response = self
            .client
            .request(Method::GET, "/api/users", self.auth)?
            .send()
            .await?;
        let list: UserList = ApiClient::handle_response(response).await?;
        Ok(list.users)
    }

    /// Change an account's role (admin only).
    pub async fn update_role(&self, id: i64, role: Role) -> Result<ApiMessage> {
        let response = self
            .client
            .request(Method::PUT, &format!("/api/users/{id}/role"), self.auth)?
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Dashboard statistics accessor.
#[derive(Debug)]
pub struct DashboardApi<'a> {
    client: &'a ApiClient,
    auth: &'a AuthSession,
}

impl DashboardApi<'_> {
    /// Headline counts.
    pub async fn overview(&self) -> Result<DashboardOverview> {
        let response = self
            .client
            .request(Method::GET, "/api/dashboard", self.auth)?
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }

    /// Inquiry counts grouped by status.
    pub async fn inquiries_by_status(&self) -> Result<Vec<StatusCount>> {
        let response = self
            .client
            .request(Method::GET, "/api/inquiries/status", self.auth)?
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }
}
