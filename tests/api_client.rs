//! REST client against a local stub of the back-office API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_solution_site::api::{
    ApiClient, ApiError, Articles, Events, Inquiries, InquiryDraft, Role,
};
use ai_solution_site::auth::AuthSession;
use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::{Value, json};

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

fn cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_list_forwards_session_cookie() {
    let router = Router::new().route(
        "/api/articles",
        get(|headers: HeaderMap| async move {
            assert_eq!(cookie(&headers), "session=tok123");
            Json(json!([
                { "id": 1, "title": "Hello", "content": "World", "author_id": 2 }
            ]))
        }),
    );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");
    let auth = AuthSession::from_token("tok123");

    let articles = client.resource::<Articles>(&auth).list().await.expect("list");
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, "Hello");
}

#[tokio::test]
async fn test_login_reads_token_from_set_cookie() {
    let router = Router::new().route(
        "/api/login",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["username"], "admin");
            (
                [(header::SET_COOKIE, "session=abc; HttpOnly; Path=/")],
                Json(json!({
                    "message": "Login successful",
                    "user": { "id": 1, "username": "admin", "role": "admin" }
                })),
            )
        }),
    );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");

    let outcome = client.login("admin", "secret").await.expect("login");
    assert_eq!(outcome.session.token(), Some("abc"));
    assert_eq!(outcome.user.map(|u| u.role), Some(Role::Admin));
}

#[tokio::test]
async fn test_login_failure_surfaces_api_message() {
    let router = Router::new().route(
        "/api/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            )
        }),
    );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");

    match client.login("admin", "wrong").await {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_the_api() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/api/contacts",
        post({
            let hits = Arc::clone(&hits);
            move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "message": "created" }))
                }
            }
        }),
    );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");
    let auth = AuthSession::anonymous();

    let draft = InquiryDraft {
        full_name: "  ".into(),
        email: "jane@example.com".into(),
        ..InquiryDraft::default()
    };
    let result = client.resource::<Inquiries>(&auth).create(&draft).await;
    assert!(matches!(result, Err(ApiError::MissingField("full_name"))));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let draft = InquiryDraft {
        full_name: "Jane Doe".into(),
        ..draft
    };
    client
        .resource::<Inquiries>(&auth)
        .create(&draft)
        .await
        .expect("created");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upcoming_events_use_filter_query() {
    let router = Router::new().route(
        "/api/events",
        get(|Query(query): Query<Vec<(String, String)>>| async move {
            assert_eq!(query, vec![("filter".to_string(), "true".to_string())]);
            Json(json!([]))
        }),
    );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");
    let auth = AuthSession::anonymous();

    let events = client
        .resource::<Events>(&auth)
        .list_upcoming()
        .await
        .expect("events");
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_users_list_unwraps_envelope_and_role_update() {
    let router = Router::new()
        .route(
            "/api/users",
            get(|| async {
                Json(json!({ "users": [
                    { "id": 7, "username": "sam", "email": "sam@example.com", "role": "customer" }
                ]}))
            }),
        )
        .route(
            "/api/users/{id}/role",
            put(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "role": "user" }));
                Json(json!({ "message": "Role updated" })).into_response()
            }),
        );
    let origin = spawn_stub(router).await;
    let client = ApiClient::new(&origin).expect("client");
    let auth = AuthSession::from_token("admin-token");

    let users = client.users(&auth).list().await.expect("users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::Customer);

    let ack = client
        .users(&auth)
        .update_role(7, Role::User)
        .await
        .expect("role update");
    assert_eq!(ack.message, "Role updated");
}
