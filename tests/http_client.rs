//! Integration tests for the HTTP client and session lifecycle.
//!
//! Each test runs an in-process fake of the dietitian service on a random
//! local port and talks to it through the real `reqwest` client.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use dietitian_chat::api::{ChatRequest, Client, DietitianApi, InitSessionRequest};
use dietitian_chat::error::Error;
use dietitian_chat::session::{Role, SessionClient};
use dietitian_chat::Operation;
use serde_json::{Value, json};

// =============================================================================
// Fake service
// =============================================================================

#[derive(Clone, Default)]
struct FakeService {
    sessions: Arc<Mutex<HashSet<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    fail_clear: Arc<AtomicBool>,
}

async fn init_session(State(svc): State<FakeService>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["session_id"].as_str().unwrap_or_default().to_string();
    svc.sessions.lock().unwrap().insert(id.clone());
    Json(json!({ "session_id": id, "status": "initialized" }))
}

async fn chat(
    State(svc): State<FakeService>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let id = body["session_id"].as_str().unwrap_or_default();
    if !svc.sessions.lock().unwrap().contains(id) {
        return Err((StatusCode::NOT_FOUND, "session not found".to_string()));
    }
    let message = body["message"].as_str().unwrap_or_default();
    Ok(Json(json!({ "response": format!("Add more vegetables to: {message}") })))
}

async fn clear_session(State(svc): State<FakeService>, Path(id): Path<String>) -> StatusCode {
    if svc.fail_clear.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    svc.sessions.lock().unwrap().remove(&id);
    svc.deleted.lock().unwrap().push(id);
    StatusCode::OK
}

fn router(svc: FakeService) -> Router {
    Router::new()
        .route("/init-session", post(init_session))
        .route("/chat", post(chat))
        .route("/clear-session/{id}", delete(clear_session))
        .with_state(svc)
}

/// Serve `app` on a random port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn setup() -> (FakeService, SessionClient) {
    let svc = FakeService::default();
    let base_url = spawn(router(svc.clone())).await;
    let client = SessionClient::new(Arc::new(Client::new(&base_url).unwrap()));
    (svc, client)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_full_session_lifecycle() {
    let (svc, mut chat) = setup().await;

    chat.start_session().await.unwrap();
    let id = chat.session_id().unwrap().to_string();
    assert!(svc.sessions.lock().unwrap().contains(&id));
    assert!(chat.transcript().is_empty());

    chat.send("hello").await.unwrap();
    let messages = chat.transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "hello");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].text, "Add more vegetables to: hello");

    chat.clear_session().await.unwrap();
    assert!(!chat.has_session());
    assert!(chat.transcript().is_empty());
    assert_eq!(*svc.deleted.lock().unwrap(), vec![id]);
}

#[tokio::test]
async fn test_non_success_status_maps_to_api_error() {
    let base_url = spawn(router(FakeService::default())).await;
    let client = Client::new(&base_url).unwrap();

    let err = client
        .chat(ChatRequest {
            message: "hello".into(),
            session_id: "unknown".into(),
        })
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "session not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_send_keeps_optimistic_entry() {
    let (svc, mut chat) = setup().await;
    chat.start_session().await.unwrap();
    // The service forgets the session behind the client's back.
    svc.sessions.lock().unwrap().clear();

    let failure = chat.send("hello").await.unwrap_err();

    assert_eq!(failure.operation, Operation::SendMessage);
    assert_eq!(chat.transcript().len(), 1);
    assert_eq!(chat.transcript().last().unwrap().role, Role::User);
    assert_eq!(chat.error(), Some("Failed to send message."));
    assert!(!chat.is_awaiting());
}

#[tokio::test]
async fn test_failed_clear_still_clears_locally() {
    let (svc, mut chat) = setup().await;
    chat.start_session().await.unwrap();
    chat.send("hello").await.unwrap();
    svc.fail_clear.store(true, Ordering::SeqCst);

    let failure = chat.clear_session().await.unwrap_err();

    assert_eq!(failure.operation, Operation::ClearSession);
    assert!(matches!(failure.source, Error::Api { status: 500, .. }));
    assert!(!chat.has_session());
    assert!(chat.transcript().is_empty());
    assert!(svc.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_base_url_prefix_is_kept() {
    let svc = FakeService::default();
    let app = Router::new().nest("/api", router(svc.clone()));
    let base_url = spawn(app).await;
    let client = Client::new(format!("{base_url}/api")).unwrap();

    let resp = client
        .init_session(InitSessionRequest {
            session_id: "prefixed".into(),
        })
        .await
        .unwrap();

    assert_eq!(resp.session_id, "prefixed");
    assert!(svc.sessions.lock().unwrap().contains("prefixed"));
}

#[tokio::test]
async fn test_unreachable_service_fails_start() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Client::new(format!("http://{addr}")).unwrap();
    let mut chat = SessionClient::new(Arc::new(api));

    let failure = chat.start_session().await.unwrap_err();

    assert_eq!(failure.operation, Operation::StartSession);
    assert!(matches!(failure.source, Error::Http(_)));
    assert!(!chat.has_session());
    assert_eq!(chat.error(), Some("Failed to start session."));
}
