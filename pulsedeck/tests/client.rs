//! Remote client against an in-process stub of the dashboard API.
use std::collections::HashMap;

use axum::{
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use pulsedeck::client::project_download_endpoint;
use pulsedeck::{CredentialStore, Failure, RemoteClient};

const GOOD: &str = "424242";

fn query_ok(q: &HashMap<String, String>) -> bool {
    q.get("token").map(String::as_str) == Some(GOOD)
}

fn body_ok(b: &Value) -> bool {
    b.get("token").and_then(Value::as_str) == Some(GOOD)
}

async fn status(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "cpu": 12.5, "ram": 40.0, "disk": 71.2,
            "uptime": "3 days",
            "agents": [{ "name": "builder", "pid": 4242 }],
            "git": { "branch": "main", "commits": [{ "msg": "init", "date": "2024-01-01" }] }
        })),
    )
}

async fn auth(Json(b): Json<Value>) -> impl IntoResponse {
    if body_ok(&b) {
        (StatusCode::OK, Json(json!({ "success": true })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })))
    }
}

async fn heartbeat(Json(b): Json<Value>) -> impl IntoResponse {
    if !body_ok(&b) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let saved = b.get("content").and_then(Value::as_str) == Some("- check backups");
    (StatusCode::OK, Json(json!({ "success": saved })))
}

async fn read(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    match q.get("path").map(String::as_str) {
        Some("missing.md") => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "File not found" })),
        ),
        Some(p) => {
            let page: u32 = q.get("page").and_then(|s| s.parse().ok()).unwrap_or(1);
            (
                StatusCode::OK,
                Json(json!({ "content": format!("{p} page {page}"), "page": page, "total_pages": 3 })),
            )
        }
        None => (StatusCode::BAD_REQUEST, Json(json!({}))),
    }
}

async fn translate(Json(b): Json<Value>) -> impl IntoResponse {
    if !body_ok(&b) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    // the service reports failures in a 200 body
    match b.get("text").and_then(Value::as_str) {
        Some("") | None => (StatusCode::OK, Json(json!({ "error": "nothing to translate" }))),
        Some(t) => (StatusCode::OK, Json(json!({ "translated": t.to_uppercase() }))),
    }
}

async fn ai_cached(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({ "used": 120000, "percent": 12.0, "model": "cached", "timestamp": 1700000000 })),
    )
}

async fn ai_live(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({ "error": "meter offline" })))
}

async fn projects(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!([
            { "name": "acme", "has_git": true, "origin": "git@example.com:acme.git",
              "files": [{ "name": "README.md", "path": "README.md", "is_dir": false }] },
            { "name": "scratch" }
        ])),
    )
}

async fn download(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !query_ok(&q) {
        return (StatusCode::UNAUTHORIZED, Vec::new());
    }
    let name = q.get("name").cloned().unwrap_or_default();
    (StatusCode::OK, format!("PK{name}").into_bytes())
}

async fn serve() -> String {
    let app = Router::new()
        .route("/api/status", get(status))
        .route("/api/auth", post(auth))
        .route("/api/heartbeat/update", post(heartbeat))
        .route("/api/files/read", get(read))
        .route("/api/translate", post(translate))
        .route("/api/ai/status", get(ai_cached))
        .route("/api/ai/status/live", get(ai_live))
        .route("/api/projects", get(projects))
        .route("/api/projects/download", get(download));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, token: Option<&str>) -> RemoteClient {
    let store = CredentialStore::in_memory(token.map(str::to_string));
    RemoteClient::new(base, store).unwrap()
}

#[tokio::test]
async fn status_with_token_in_query() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    let s = c.status().await.expect("status");
    assert_eq!(s.agents[0].pid, "4242");
    assert_eq!(s.git.branch, "main");
    assert_eq!(s.commits().len(), 1);
}

#[tokio::test]
async fn unauthorized_status_clears_credential() {
    let base = serve().await;
    let c = client(&base, Some("stale"));
    assert_eq!(c.status().await.unwrap_err(), Failure::Auth);
    assert!(!c.credential().is_present());
}

#[tokio::test]
async fn auth_check_never_clears_credential() {
    let base = serve().await;
    let c = client(&base, Some("stored"));
    assert_eq!(c.check_auth("wrong").await, Err(Failure::Auth));
    assert_eq!(c.credential().get().as_deref(), Some("stored"));
    assert_eq!(c.check_auth(GOOD).await, Ok(()));
}

#[tokio::test]
async fn heartbeat_sends_token_in_body() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    assert_eq!(c.update_heartbeat("- check backups").await, Ok(true));
    assert_eq!(c.update_heartbeat("other").await, Ok(false));
}

#[tokio::test]
async fn file_read_pages_and_content_errors() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    let page = c.read_file("docs/a b.md", 2).await.expect("read");
    assert_eq!(page.content, "docs/a b.md page 2");
    assert_eq!((page.page, page.total_pages), (2, 3));

    match c.read_file("missing.md", 1).await {
        Err(Failure::Content(msg)) => assert_eq!(msg, "File not found"),
        other => panic!("expected content failure, got {other:?}"),
    }
    // a content failure is not an auth failure
    assert!(c.credential().is_present());
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let c = client(&format!("http://{addr}"), Some(GOOD));
    assert!(matches!(c.status().await, Err(Failure::Transport(_))));
    assert!(c.credential().is_present());
}

#[tokio::test]
async fn download_streams_to_file() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("acme.zip");
    let n = c
        .download(&project_download_endpoint("acme"), &dest)
        .await
        .expect("download");
    assert_eq!(n, 6);
    assert_eq!(std::fs::read(&dest).unwrap(), b"PKacme");
}

#[tokio::test]
async fn translate_sends_token_in_body() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    assert_eq!(c.translate("hola").await, Ok("HOLA".to_string()));

    match c.translate("").await {
        Err(Failure::Content(msg)) => assert_eq!(msg, "nothing to translate"),
        other => panic!("expected content failure, got {other:?}"),
    }

    let stale = client(&base, Some("stale"));
    assert_eq!(stale.translate("hola").await, Err(Failure::Auth));
    assert!(!stale.credential().is_present());
}

#[tokio::test]
async fn ai_status_picks_cached_or_live_endpoint() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    let cached = c.ai_status(false).await.expect("cached usage");
    assert_eq!(cached.used, 120_000);
    assert_eq!(cached.total, None);
    assert_eq!(cached.model.as_deref(), Some("cached"));

    match c.ai_status(true).await {
        Err(Failure::Content(msg)) => assert_eq!(msg, "meter offline"),
        other => panic!("expected content failure, got {other:?}"),
    }
}

#[tokio::test]
async fn projects_list_decodes_badges_and_files() {
    let base = serve().await;
    let c = client(&base, Some(GOOD));
    let list = c.projects().await.expect("projects");
    assert_eq!(list.len(), 2);
    assert!(list[0].has_git && list[0].linked_to_origin());
    assert_eq!(list[0].files[0].path, "README.md");
    assert!(!list[1].linked_to_origin());
    assert!(list[1].files.is_empty());
}
