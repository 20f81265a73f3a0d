use axum::{
    Extension, Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::api::{
    ApiClient, ApiError, ArticleDraft, Articles, Events, Feedbacks, Inquiries, InquiryDraft, Role,
    Solutions,
};
use crate::auth::{AuthSession, DASHBOARD_PATH, LOGIN_PATH, admin_gate_middleware};
use crate::chat::{ChatTransport, HttpChatTransport, PointerTarget};
use crate::config::AppConfig;
use crate::render::escape_html;
use crate::session::{SessionStore, WidgetSession};
use crate::ui;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let transport = HttpChatTransport::new(
        &config.chat.base_url,
        &config.chat.path,
        config.chat.request_timeout(),
    )?;
    info!(
        name: "chat.config.loaded",
        endpoint = %transport.endpoint(),
        timeout_secs = ?config.chat.request_timeout_secs,
        "Chat endpoint configured"
    );
    let transport: Arc<dyn ChatTransport> = Arc::new(transport);

    let api = Arc::new(ApiClient::new(&config.api.base_url)?);
    info!(name: "api.config.loaded", base_url = %api.base_url(), "REST API configured");

    let sessions = SessionStore::new(transport, config.chat.greeting().map(str::to_string));
    let _sweeper = sessions.spawn_sweeper(
        config.widget.sweep_interval(),
        config.widget.idle_timeout(),
    );

    let state = AppState {
        sessions,
        api,
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Pages
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/events", get(events_page))
        .route("/articles/{id}", get(article_page))
        .route("/contact", get(contact_page).post(contact_submit))
        // Widget fragments
        .route("/widget/panel", get(widget_panel))
        .route("/widget/toggle", post(widget_toggle))
        .route("/widget/pointer", post(widget_pointer))
        .route("/widget/messages", post(widget_message))
        // Admin
        .route("/admin", get(|| async { Redirect::to(DASHBOARD_PATH) }))
        .route(LOGIN_PATH, get(login_page).post(login_submit))
        .route("/admin/logout", post(logout))
        .route(DASHBOARD_PATH, get(dashboard))
        .route("/admin/articles/{id}/edit", get(article_edit))
        .route("/admin/articles/{id}", post(article_update))
        .route("/admin/inquiries", get(admin_inquiries))
        .route("/admin/inquiries/{id}/status", post(inquiry_status))
        .route("/admin/users", get(admin_users))
        .route("/admin/users/{id}/role", post(user_role));
    let router = admin_collection::<Articles>(router);
    let router = admin_collection::<Events>(router);
    let router = admin_collection::<Solutions>(router);
    let router = admin_collection::<Feedbacks>(router);

    router
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(admin_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages
// ─────────────────────────────────────────────────────────────────────────────

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    site_page(&state, "Home", ui::home_content())
}

/// Public page with a fresh chat widget attached.
fn site_page(state: &AppState, title: &str, content: &str) -> Html<String> {
    let session = state.sessions.create();
    info!(name: "widget.session.created", session_id = %session.id(), "Widget session created");

    let content = format!("{content}{}", render_widget(&session));
    Html(ui::html_shell(title, &content))
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "widget_sessions": state.sessions.len(),
    }))
}

async fn not_found() -> Response {
    not_found_page()
}

fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(ui::html_shell("Not found", ui::not_found_content())),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WidgetParams {
    widget_id: String,
}

#[derive(Debug, Deserialize)]
struct PointerForm {
    widget_id: String,
    target: PointerTarget,
}

#[derive(Debug, Deserialize)]
struct MessageForm {
    widget_id: String,
    #[serde(default)]
    message: String,
}

/// GET /widget/panel - Re-render the widget, e.g. while polling a turn.
async fn widget_panel(
    State(state): State<AppState>,
    Query(params): Query<WidgetParams>,
) -> Result<Html<String>, StatusCode> {
    let session = lookup(&state.sessions, &params.widget_id)?;
    Ok(Html(render_widget(&session)))
}

/// POST /widget/toggle - Open or close the panel.
async fn widget_toggle(
    State(state): State<AppState>,
    Form(form): Form<WidgetParams>,
) -> Result<Html<String>, StatusCode> {
    let session = lookup(&state.sessions, &form.widget_id)?;
    let widget = session.toggle_open();
    tracing::debug!(
        name: "widget.toggled",
        session_id = %session.id(),
        is_open = widget.is_open(),
        "Widget toggled"
    );
    Ok(Html(render_widget(&session)))
}

/// POST /widget/pointer - A pointer-down the page reported.
async fn widget_pointer(
    State(state): State<AppState>,
    Form(form): Form<PointerForm>,
) -> Result<Html<String>, StatusCode> {
    let session = lookup(&state.sessions, &form.widget_id)?;
    session.pointer_down(form.target);
    Ok(Html(render_widget(&session)))
}

/// POST /widget/messages - Submit the composed message.
///
/// The turn is started here and completed in a spawned task, so the
/// response already shows the user message and the thinking indicator.
async fn widget_message(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Result<Html<String>, StatusCode> {
    let session = lookup(&state.sessions, &form.widget_id)?;
    session.touch();

    match session.chat().begin(&form.message) {
        Ok(turn) => {
            let chat = session.chat().clone();
            tokio::spawn(async move {
                let outcome = chat.run(turn).await;
                tracing::debug!(name: "chat.turn.settled", outcome = ?outcome, "Chat turn settled");
            });
        }
        Err(rejection) => {
            tracing::debug!(
                name: "chat.turn.rejected",
                session_id = %session.id(),
                reason = ?rejection,
                "Submission ignored"
            );
        }
    }

    Ok(Html(render_widget(&session)))
}

/// Resolve a widget id, recreating sessions that were evicted.
fn lookup(sessions: &SessionStore, widget_id: &str) -> Result<WidgetSession, StatusCode> {
    let id = Uuid::parse_str(widget_id).map_err(|e| {
        tracing::debug!(name: "widget.id.invalid", error = %e, "Rejected malformed widget id");
        StatusCode::BAD_REQUEST
    })?;
    Ok(sessions.get_or_create(&id.to_string()))
}

fn render_widget(session: &WidgetSession) -> String {
    let view = session.chat().snapshot();
    let scroll = session.after_render(view.revision);
    ui::widget_view(session.id(), session.widget(), &view, scroll)
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_page() -> Html<String> {
    Html(ui::html_shell("Sign in", &ui::login_view(None)))
}

async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api.login(&form.username, &form.password).await {
        Ok(outcome) => {
            info!(
                name: "auth.login.succeeded",
                username = %form.username,
                "Admin signed in"
            );
            (outcome.session.persist(jar), Redirect::to(DASHBOARD_PATH)).into_response()
        }
        Err(e) => {
            tracing::warn!(name: "auth.login.failed", error = %e, "Admin sign-in failed");
            let message = match e {
                ApiError::MissingField(_) => "Username and password are required.",
                ApiError::Api { status: 401 | 403, .. } => "Invalid username or password.",
                _ => "Sign-in is unavailable right now. Please try again later.",
            };
            (
                StatusCode::UNAUTHORIZED,
                Html(ui::html_shell("Sign in", &ui::login_view(Some(message)))),
            )
                .into_response()
        }
    }
}

async fn logout(
    State(state): State<AppState>,
    Extension(mut auth): Extension<AuthSession>,
    jar: CookieJar,
) -> Response {
    if let Err(e) = state.api.logout(&auth).await {
        tracing::warn!(name: "auth.logout.failed", error = %e, "API logout failed; clearing local session");
    }
    (auth.teardown(jar), Redirect::to(LOGIN_PATH)).into_response()
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(mut auth): Extension<AuthSession>,
    jar: CookieJar,
) -> Response {
    let api = state.api.dashboard(&auth);
    let (overview, statuses) = tokio::join!(api.overview(), api.inquiries_by_status());

    match (overview, statuses) {
        (Ok(overview), Ok(statuses)) => Html(ui::html_shell(
            "Dashboard",
            &ui::dashboard_view(&overview, &statuses),
        ))
        .into_response(),
        (Err(ApiError::Api { status: 401, .. }), _) | (_, Err(ApiError::Api { status: 401, .. })) => {
            info!(name: "auth.session.expired", "API rejected the session; signing out");
            (auth.teardown(jar), Redirect::to(LOGIN_PATH)).into_response()
        }
        (Err(e), _) | (_, Err(e)) => api_failure(e, auth, jar, "Dashboard"),
    }
}

/// Turn a failed API call into a response.
///
/// A 401 means the token expired: the session is torn down and the browser
/// goes back to the login page. Rejected drafts are the caller's fault (400);
/// anything else is an upstream failure (502).
fn api_failure(error: ApiError, mut auth: AuthSession, jar: CookieJar, title: &str) -> Response {
    match error {
        ApiError::Api { status: 401, .. } => {
            info!(name: "auth.session.expired", "API rejected the session; signing out");
            (auth.teardown(jar), Redirect::to(LOGIN_PATH)).into_response()
        }
        ApiError::Api { status: 404, .. } => not_found_page(),
        e @ (ApiError::MissingField(_) | ApiError::InvalidField { .. }) => {
            tracing::debug!(name: "api.request.rejected", error = %e, "Draft rejected before sending");
            (
                StatusCode::BAD_REQUEST,
                Html(ui::html_shell(title, &message_content(&e.to_string()))),
            )
                .into_response()
        }
        e => {
            tracing::error!(name: "api.request.failed", page = title, error = %e, "REST API call failed");
            unavailable(title)
        }
    }
}

fn unavailable(title: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html(ui::html_shell(
            title,
            &message_content(&format!("{title} is unavailable right now.")),
        )),
    )
        .into_response()
}

fn message_content(message: &str) -> String {
    format!(r#"<p class="p-4 rounded-lg bg-white shadow">{}</p>"#, escape_html(message))
}

/// Register the list and delete routes of one admin collection.
fn admin_collection<R: ui::AdminTable>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/admin/{}", R::SLUG);
    router
        .route(&base, get(admin_list::<R>))
        .route(&format!("{base}/{{id}}/delete"), post(admin_delete::<R>))
}

/// GET /admin/{collection}
async fn admin_list<R: ui::AdminTable>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
) -> Response {
    let result = state.api.resource::<R>(&auth).list().await;
    match result {
        Ok(records) => Html(ui::html_shell(R::TITLE, &ui::resource_list_view::<R>(&records)))
            .into_response(),
        Err(e) => api_failure(e, auth, jar, R::TITLE),
    }
}

/// POST /admin/{collection}/{id}/delete
async fn admin_delete<R: ui::AdminTable>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let result = state.api.resource::<R>(&auth).delete(id).await;
    match result {
        Ok(_) => {
            info!(name: "admin.record.deleted", collection = R::SLUG, id, "Record deleted");
            Redirect::to(&format!("/admin/{}", R::SLUG)).into_response()
        }
        Err(e) => api_failure(e, auth, jar, R::TITLE),
    }
}

#[derive(Debug, Deserialize)]
struct ArticleForm {
    title: String,
    content: String,
    author_id: i64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image_url: String,
}

impl From<ArticleForm> for ArticleDraft {
    fn from(form: ArticleForm) -> Self {
        Self {
            title: form.title,
            content: form.content,
            author_id: form.author_id,
            category: non_blank(form.category),
            image_url: non_blank(form.image_url),
        }
    }
}

/// GET /admin/articles/{id}/edit
async fn article_edit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    let result = state.api.resource::<Articles>(&auth).get(id).await;
    match result {
        Ok(article) => {
            let draft = ArticleDraft {
                title: article.title,
                content: article.content,
                author_id: article.author_id,
                category: article.category,
                image_url: article.image_url,
            };
            Html(ui::html_shell("Edit article", &ui::article_edit_view(id, &draft, None)))
                .into_response()
        }
        Err(e) => api_failure(e, auth, jar, "Edit article"),
    }
}

/// POST /admin/articles/{id}
async fn article_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let draft = ArticleDraft::from(form);
    let result = state.api.resource::<Articles>(&auth).update(id, &draft).await;
    match result {
        Ok(_) => {
            info!(name: "admin.article.updated", id, "Article updated");
            Redirect::to("/admin/articles").into_response()
        }
        Err(e @ (ApiError::MissingField(_) | ApiError::InvalidField { .. })) => (
            StatusCode::BAD_REQUEST,
            Html(ui::html_shell(
                "Edit article",
                &ui::article_edit_view(id, &draft, Some(&e.to_string())),
            )),
        )
            .into_response(),
        Err(e) => api_failure(e, auth, jar, "Edit article"),
    }
}

#[derive(Debug, Deserialize)]
struct InquiryFilter {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusForm {
    status: String,
}

/// GET /admin/inquiries - Optionally filtered by `?status=`.
async fn admin_inquiries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Query(filter): Query<InquiryFilter>,
) -> Response {
    let status = filter
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let api = state.api.resource::<Inquiries>(&auth);
    let result = match status {
        Some(status) => api.list_by_status(status).await,
        None => api.list().await,
    };
    match result {
        Ok(inquiries) => Html(ui::html_shell(
            "Inquiries",
            &ui::inquiries_view(&inquiries, status),
        ))
        .into_response(),
        Err(e) => api_failure(e, auth, jar, "Inquiries"),
    }
}

/// POST /admin/inquiries/{id}/status
async fn inquiry_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    if !ui::INQUIRY_STATUSES.contains(&form.status.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Html(ui::html_shell("Inquiries", &message_content("Unknown inquiry status."))),
        )
            .into_response();
    }
    let result = state
        .api
        .resource::<Inquiries>(&auth)
        .set_status(id, &form.status)
        .await;
    match result {
        Ok(_) => {
            info!(name: "admin.inquiry.status_changed", id, status = %form.status, "Inquiry status changed");
            Redirect::to("/admin/inquiries").into_response()
        }
        Err(e) => api_failure(e, auth, jar, "Inquiries"),
    }
}

#[derive(Debug, Deserialize)]
struct RoleForm {
    role: Role,
}

/// GET /admin/users
async fn admin_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
) -> Response {
    let result = state.api.users(&auth).list().await;
    match result {
        Ok(users) => Html(ui::html_shell("Users", &ui::users_view(&users))).into_response(),
        Err(e) => api_failure(e, auth, jar, "Users"),
    }
}

/// POST /admin/users/{id}/role
async fn user_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Response {
    let result = state.api.users(&auth).update_role(id, form.role).await;
    match result {
        Ok(_) => {
            info!(name: "admin.user.role_changed", id, role = form.role.as_str(), "User role changed");
            Redirect::to("/admin/users").into_response()
        }
        Err(e) => api_failure(e, auth, jar, "Users"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public content
// ─────────────────────────────────────────────────────────────────────────────

/// GET /events - Upcoming events, read anonymously.
async fn events_page(State(state): State<AppState>) -> Response {
    let anonymous = AuthSession::anonymous();
    let result = state.api.resource::<Events>(&anonymous).list_upcoming().await;
    match result {
        Ok(events) => site_page(&state, "Events", &ui::events_view(&events)).into_response(),
        Err(e) => {
            tracing::error!(name: "api.request.failed", page = "Events", error = %e, "REST API call failed");
            unavailable("Events")
        }
    }
}

/// GET /articles/{id}
async fn article_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let anonymous = AuthSession::anonymous();
    let result = state.api.resource::<Articles>(&anonymous).get(id).await;
    match result {
        Ok(article) => site_page(&state, &article.title, &ui::article_view(&article)).into_response(),
        Err(ApiError::Api { status: 404, .. }) => not_found_page(),
        Err(e) => {
            tracing::error!(name: "api.request.failed", page = "Article", error = %e, "REST API call failed");
            unavailable("Article")
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContactForm {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    interested_product: String,
    #[serde(default)]
    inquiry_reason: String,
}

impl From<ContactForm> for InquiryDraft {
    fn from(form: ContactForm) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone_number: non_blank(form.phone_number),
            company_name: non_blank(form.company_name),
            country: non_blank(form.country),
            interested_product: non_blank(form.interested_product),
            inquiry_reason: non_blank(form.inquiry_reason),
            ..Self::default()
        }
    }
}

/// GET /contact
async fn contact_page(State(state): State<AppState>) -> Html<String> {
    site_page(&state, "Contact", &ui::contact_view(None, false))
}

/// POST /contact - Files an inquiry with the REST API.
async fn contact_submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let draft = InquiryDraft::from(form);
    let anonymous = AuthSession::anonymous();
    let result = state.api.resource::<Inquiries>(&anonymous).create(&draft).await;
    match result {
        Ok(_) => {
            info!(name: "contact.inquiry.created", "Contact inquiry submitted");
            site_page(&state, "Contact", &ui::contact_view(None, true)).into_response()
        }
        Err(e @ (ApiError::MissingField(_) | ApiError::InvalidField { .. })) => (
            StatusCode::BAD_REQUEST,
            site_page(&state, "Contact", &ui::contact_view(Some(&e.to_string()), false)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(name: "contact.inquiry.failed", error = %e, "Failed to submit inquiry");
            (
                StatusCode::BAD_GATEWAY,
                site_page(
                    &state,
                    "Contact",
                    &ui::contact_view(Some("We could not send your message. Please try again later."), false),
                ),
            )
                .into_response()
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
