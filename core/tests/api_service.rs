//! `ApiService` behavior against the in-process `MockBackend`.
//!
//! # Design
//! Each test builds a service on top of a `MockBackend`, subscribes on a
//! spawned task, then plays the server: it pulls the intercepted connection,
//! asserts on the request, and resolves it.

use std::sync::Arc;
use std::time::Duration;

use api_core::testing::{MockBackend, ReadyState};
use api_core::{ApiService, HttpMethod, HttpResponse, TransportError};

fn setup() -> (ApiService, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let service = ApiService::new(backend.clone());
    (service, backend)
}

#[tokio::test]
async fn get_request_is_intercepted_and_answered() {
    let (service, backend) = setup();

    let pending = tokio::spawn(service.request("get").subscribe());

    let mut conn = backend.next_connection().await;
    assert_eq!(conn.request().method, HttpMethod::Get);
    assert_eq!(conn.request().url, "https://some_api:4000");
    assert!(!pending.is_finished());

    conn.mock_respond(HttpResponse::new("foo"));

    let response = pending.await.unwrap().unwrap();
    assert_eq!(response.body, "foo");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn every_method_name_reaches_the_transport() {
    let (service, backend) = setup();

    for (name, expected) in [
        ("get", HttpMethod::Get),
        ("post", HttpMethod::Post),
        ("PUT", HttpMethod::Put),
        ("delete", HttpMethod::Delete),
        ("patch", HttpMethod::Patch),
        ("propfind", HttpMethod::Other("propfind".to_string())),
    ] {
        let pending = tokio::spawn(service.request(name).subscribe());
        let mut conn = backend.next_connection().await;
        assert_eq!(conn.request().method, expected, "{name}");
        conn.mock_respond(HttpResponse::new(name));
        assert_eq!(pending.await.unwrap().unwrap().body, name);
        assert_eq!(backend.pending_connections(), 0, "{name}: exactly one connection");
    }
}

#[tokio::test]
async fn request_is_not_sent_until_subscribed() {
    let (service, backend) = setup();

    let deferred = service.request("get");
    tokio::task::yield_now().await;
    assert!(backend.try_next_connection().is_none());

    let pending = tokio::spawn(deferred.subscribe());
    let mut conn = backend.next_connection().await;
    conn.mock_respond(HttpResponse::new("late"));
    assert_eq!(pending.await.unwrap().unwrap().body, "late");
}

#[tokio::test]
async fn transport_error_reaches_the_subscriber_unchanged() {
    let (service, backend) = setup();

    let pending = tokio::spawn(service.request("get").subscribe());
    let mut conn = backend.next_connection().await;
    conn.mock_error(TransportError::Mocked("connection reset".to_string()));

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err, TransportError::Mocked("connection reset".to_string()));
}

#[tokio::test]
async fn non_2xx_response_from_stub_is_passed_through() {
    let (service, backend) = setup();

    let pending = tokio::spawn(service.request("get").subscribe());
    let mut conn = backend.next_connection().await;
    conn.mock_respond(HttpResponse::new("missing").with_status(404, "Not Found"));

    let response = pending.await.unwrap().unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.body, "missing");
}

#[tokio::test]
async fn unresolved_connection_never_completes() {
    let (service, backend) = setup();

    let pending = tokio::spawn(service.request("get").subscribe());
    let conn = backend.next_connection().await;
    assert_eq!(conn.ready_state(), ReadyState::Open);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!pending.is_finished());

    // Dropping the connection without answering does not complete it either.
    drop(conn);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!pending.is_finished());
    pending.abort();
}

#[tokio::test]
async fn concurrent_requests_resolve_independently() {
    let (service, backend) = setup();

    let first = tokio::spawn(service.request("get").subscribe());
    let mut conn_a = backend.next_connection().await;
    let second = tokio::spawn(service.request("post").subscribe());
    let mut conn_b = backend.next_connection().await;

    assert_eq!(conn_a.request().method, HttpMethod::Get);
    assert_eq!(conn_b.request().method, HttpMethod::Post);

    conn_b.mock_respond(HttpResponse::new("b"));
    assert_eq!(second.await.unwrap().unwrap().body, "b");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!first.is_finished());
    assert_eq!(conn_a.ready_state(), ReadyState::Open);

    conn_a.mock_respond(HttpResponse::new("a"));
    assert_eq!(first.await.unwrap().unwrap().body, "a");
}

#[tokio::test]
async fn resubscribing_opens_a_new_connection() {
    let (service, backend) = setup();
    let deferred = service.request("get");

    for body in ["one", "two"] {
        let pending = tokio::spawn(deferred.subscribe());
        let mut conn = backend.next_connection().await;
        conn.mock_respond(HttpResponse::new(body));
        assert_eq!(pending.await.unwrap().unwrap().body, body);
    }
    assert!(backend.try_next_connection().is_none());
}

#[tokio::test]
async fn awaiting_the_request_directly_works() {
    let (service, backend) = setup();

    let responder = tokio::spawn({
        let backend = backend.clone();
        async move {
            let mut conn = backend.next_connection().await;
            conn.mock_respond(HttpResponse::new(r#"{"ok":true}"#));
        }
    });

    let response = service.request("get").await.unwrap();
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["ok"], true);
    responder.await.unwrap();
}
