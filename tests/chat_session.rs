//! Chat controller behaviour against a local stub of the chat endpoint.

use std::sync::Arc;
use std::time::Duration;

use ai_solution_site::chat::{
    APOLOGY, ChatSession, ChatTransport, ChatTransportError, HttpChatTransport, Message,
    Rejection, Sender, TurnOutcome,
};
use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tokio::sync::Notify;

/// Serve `router` on an ephemeral port and return its origin.
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

fn http_session(origin: &str) -> ChatSession<HttpChatTransport> {
    let transport = HttpChatTransport::new(origin, "/api/chat", Some(Duration::from_secs(5)))
        .expect("valid endpoint");
    ChatSession::new(Arc::new(transport), None)
}

fn texts(messages: &[Message]) -> Vec<(Sender, &str)> {
    messages.iter().map(|m| (m.sender(), m.text())).collect()
}

#[tokio::test]
async fn test_happy_path_sends_trimmed_text() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body, json!({ "message": "Hello" }));
            Json(json!({ "response": "**Hi** there!" }))
        }),
    );
    let origin = spawn_stub(router).await;
    let session = http_session(&origin);

    let outcome = session.submit("  Hello  ").await.expect("accepted");
    assert_eq!(outcome, TurnOutcome::Completed(Sender::Assistant));

    let view = session.snapshot();
    assert_eq!(
        texts(&view.messages),
        vec![(Sender::User, "Hello"), (Sender::Assistant, "**Hi** there!")]
    );
    assert!(!view.is_awaiting_response);
    assert_eq!(view.draft_input, "");
}

#[tokio::test]
async fn test_http_500_appends_apology() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let origin = spawn_stub(router).await;
    let session = http_session(&origin);

    let outcome = session.submit("Hello").await.expect("accepted");
    assert_eq!(outcome, TurnOutcome::Completed(Sender::Error));

    let view = session.snapshot();
    assert_eq!(
        texts(&view.messages),
        vec![(Sender::User, "Hello"), (Sender::Error, APOLOGY)]
    );
    assert!(!view.is_awaiting_response);
}

#[tokio::test]
async fn test_malformed_body_appends_apology() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { Json(json!({ "reply": "wrong field" })) }),
    );
    let origin = spawn_stub(router).await;
    let session = http_session(&origin);

    session.submit("Hello").await.expect("accepted");
    let view = session.snapshot();
    assert_eq!(view.messages.last().map(Message::sender), Some(Sender::Error));
}

#[tokio::test]
async fn test_unreachable_endpoint_appends_apology() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let session = http_session(&format!("http://{addr}"));
    session.submit("Hello").await.expect("accepted");

    let view = session.snapshot();
    assert_eq!(
        texts(&view.messages),
        vec![(Sender::User, "Hello"), (Sender::Error, APOLOGY)]
    );
}

#[tokio::test]
async fn test_transport_reports_status_and_payload_errors() {
    let router = Router::new()
        .route("/api/chat", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/api/bad", post(|| async { "not json" }));
    let origin = spawn_stub(router).await;

    let transport = HttpChatTransport::new(&origin, "/api/chat", None).expect("endpoint");
    assert!(matches!(
        transport.send("hi").await,
        Err(ChatTransportError::Status(503))
    ));

    let transport = HttpChatTransport::new(&origin, "/api/bad", None).expect("endpoint");
    assert!(matches!(
        transport.send("hi").await,
        Err(ChatTransportError::Payload(_))
    ));
}

/// Transport that holds every request until released.
struct Gate {
    release: Notify,
}

#[async_trait::async_trait]
impl ChatTransport for Gate {
    async fn send(&self, message: &str) -> Result<String, ChatTransportError> {
        self.release.notified().await;
        Ok(format!("reply to {message}"))
    }
}

#[tokio::test]
async fn test_single_flight_and_order() {
    let gate = Arc::new(Gate {
        release: Notify::new(),
    });
    let session = ChatSession::new(Arc::clone(&gate), None);

    let turn = session.begin("first").expect("accepted");
    assert!(session.is_awaiting_response());
    assert_eq!(session.begin("second"), Err(Rejection::AwaitingResponse));

    let runner = {
        let session = session.clone();
        tokio::spawn(async move { session.run(turn).await })
    };
    tokio::task::yield_now().await;
    gate.release.notify_one();
    assert_eq!(
        runner.await.expect("join"),
        TurnOutcome::Completed(Sender::Assistant)
    );

    let turn = session.begin("second").expect("accepted after settle");
    gate.release.notify_one();
    session.run(turn).await;

    let view = session.snapshot();
    assert_eq!(
        texts(&view.messages),
        vec![
            (Sender::User, "first"),
            (Sender::Assistant, "reply to first"),
            (Sender::User, "second"),
            (Sender::Assistant, "reply to second"),
        ]
    );
}

#[tokio::test]
async fn test_whitespace_submission_is_a_no_op() {
    let gate = Arc::new(Gate {
        release: Notify::new(),
    });
    let session = ChatSession::new(gate, None);
    let before = session.snapshot();

    assert_eq!(session.submit("   ").await, Err(Rejection::EmptyInput));

    let after = session.snapshot();
    assert_eq!(after.messages, before.messages);
    assert_eq!(after.revision, before.revision);
    assert!(!after.is_awaiting_response);
}

#[tokio::test]
async fn test_late_response_after_teardown_is_discarded() {
    let gate = Arc::new(Gate {
        release: Notify::new(),
    });
    let session = ChatSession::new(Arc::clone(&gate), None);

    let turn = session.begin("Hello").expect("accepted");
    let runner = {
        let session = session.clone();
        tokio::spawn(async move { session.run(turn).await })
    };

    session.teardown();
    gate.release.notify_one();

    assert_eq!(runner.await.expect("join"), TurnOutcome::Discarded);
    assert_eq!(texts(&session.snapshot().messages), vec![(Sender::User, "Hello")]);
    assert_eq!(session.begin("again"), Err(Rejection::TornDown));
}

#[tokio::test]
async fn test_transcript_never_shrinks_across_failures() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            if body["message"] == "fail" {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
            } else {
                (StatusCode::OK, Json(json!({ "response": "ok" })))
            }
        }),
    );
    let origin = spawn_stub(router).await;
    let session = http_session(&origin);

    let mut earlier: Vec<Message> = Vec::new();
    for text in ["one", "fail", "two", "fail", "three"] {
        session.submit(text).await.expect("accepted");
        let view = session.snapshot();
        assert_eq!(view.messages.len(), earlier.len() + 2);
        // Earlier entries keep their sender, text and position.
        assert_eq!(view.messages[..earlier.len()], earlier[..]);
        assert_eq!(view.messages[earlier.len()].text(), text);
        earlier = view.messages;
    }
    assert_eq!(earlier[3].sender(), Sender::Error);
    assert_eq!(earlier[7].sender(), Sender::Error);
}
