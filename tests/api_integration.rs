//! HTTP API integration tests.
//!
//! Drives the full router (middleware, CORS, handlers) with
//! `tower::ServiceExt::oneshot` over in-memory stores.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use todo_backend::http::router;
use todo_backend::storage::{InMemoryCounterStore, SqliteTodoRepository};
use todo_backend::TodoService;
use tower::ServiceExt;

const BASE: &str = "/api/todos";

fn app() -> Router {
    let store = Arc::new(InMemoryCounterStore::new());
    let service = TodoService::new(
        Arc::new(SqliteTodoRepository::in_memory().unwrap()),
        store.clone(),
        store,
    );
    router(service, BASE)
}

struct Reply {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    Reply {
        status,
        headers,
        body,
    }
}

#[tokio::test]
async fn test_crud_flow() {
    let app = app();

    let created = send(
        &app,
        Method::POST,
        BASE,
        Some(json!({"title": "Buy milk", "description": "2 liters"})),
    )
    .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(
        created.json(),
        json!({"id": 1, "title": "Buy milk", "description": "2 liters", "completed": false})
    );

    let fetched = send(&app, Method::GET, &format!("{BASE}/1"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["title"], "Buy milk");

    let updated = send(
        &app,
        Method::PUT,
        &format!("{BASE}/1"),
        Some(json!({"id": 1, "title": "Buy oat milk", "completed": true})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(
        updated.json(),
        json!({"id": 1, "title": "Buy oat milk", "description": null, "completed": true})
    );

    let listed = send(&app, Method::GET, BASE, None).await;
    assert_eq!(listed.json().as_array().unwrap().len(), 1);

    let deleted = send(&app, Method::DELETE, &format!("{BASE}/1"), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert!(deleted.body.is_empty());

    let listed = send(&app, Method::GET, BASE, None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let app = app();
    let created = send(&app, Method::POST, BASE, Some(json!({"id": 42, "title": "A"}))).await;
    assert_eq!(created.json()["id"], 1);
}

#[tokio::test]
async fn test_get_missing_is_404_empty() {
    let app = app();
    let reply = send(&app, Method::GET, &format!("{BASE}/999"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_update_missing_is_404_without_counter() {
    let app = app();
    let reply = send(
        &app,
        Method::PUT,
        &format!("{BASE}/999"),
        Some(json!({"title": "nope"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.body.is_empty());

    let stats = send(&app, Method::GET, &format!("{BASE}/stats"), None).await;
    assert_eq!(stats.json()["todos_updated"], 0);
}

#[tokio::test]
async fn test_delete_missing_is_ok_and_counted() {
    let app = app();
    let reply = send(&app, Method::DELETE, &format!("{BASE}/999"), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let stats = send(&app, Method::GET, &format!("{BASE}/stats"), None).await;
    assert_eq!(stats.json()["todos_deleted"], 1);
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let app = app();
    let reply = send(&app, Method::GET, &format!("{BASE}/abc"), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri(BASE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing_title = send(&app, Method::POST, BASE, Some(json!({"completed": true}))).await;
    assert_eq!(missing_title.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_completed_and_stats_routes() {
    let app = app();
    send(&app, Method::POST, BASE, Some(json!({"title": "open"}))).await;
    send(
        &app,
        Method::POST,
        BASE,
        Some(json!({"title": "done", "completed": true})),
    )
    .await;

    let completed = send(&app, Method::GET, &format!("{BASE}/completed"), None).await;
    assert_eq!(completed.status, StatusCode::OK);
    let completed = completed.json();
    assert_eq!(completed.as_array().unwrap().len(), 1);
    assert_eq!(completed[0]["title"], "done");

    send(&app, Method::GET, BASE, None).await;
    send(&app, Method::GET, BASE, None).await;

    let stats = send(&app, Method::GET, &format!("{BASE}/stats"), None).await;
    assert_eq!(
        stats.json(),
        json!({"todos_created": 2, "todos_updated": 0, "todos_deleted": 0, "db_reads": 1})
    );

    let reset = send(&app, Method::POST, &format!("{BASE}/stats/reset"), None).await;
    assert_eq!(reset.status, StatusCode::OK);
    assert!(reset.body.is_empty());

    let stats = send(&app, Method::GET, &format!("{BASE}/stats"), None).await;
    assert_eq!(
        stats.json(),
        json!({"todos_created": 0, "todos_updated": 0, "todos_deleted": 0, "db_reads": 0})
    );
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let reply = send(&app, Method::GET, &format!("{BASE}/health"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"status": "UP", "service": "todo-backend"}));
}

#[tokio::test]
async fn test_request_id_is_propagated_or_generated() {
    let app = app();

    let request = Request::builder()
        .uri(format!("{BASE}/health"))
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let reply = send(&app, Method::GET, &format!("{BASE}/health"), None).await;
    let generated = reply.headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(BASE)
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_custom_base_path() {
    let store = Arc::new(InMemoryCounterStore::new());
    let service = TodoService::new(
        Arc::new(SqliteTodoRepository::in_memory().unwrap()),
        store.clone(),
        store,
    );
    let app = router(service, "/v2/tasks");

    let reply = send(&app, Method::POST, "/v2/tasks", Some(json!({"title": "A"}))).await;
    assert_eq!(reply.status, StatusCode::OK);

    let old = send(&app, Method::GET, BASE, None).await;
    assert_eq!(old.status, StatusCode::NOT_FOUND);
}
