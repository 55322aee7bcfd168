//! End-to-end tests of the authenticated request pipeline against an
//! in-process axum backend.
//!
//! The backend tracks how many refresh exchanges it served and which
//! bearer tokens it saw, which is what the pipeline guarantees are
//! about: concurrent 401s coalesce into one exchange, failures end the
//! session exactly once, and the coordinator always returns to idle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use radarsnap_sdk::{ApiClient, ApiError, ClientConfig};

// ---------------------------------------------------------------------------
// Test backend
// ---------------------------------------------------------------------------

struct TestBackend {
    refresh_calls: AtomicUsize,
    valid_token: Mutex<String>,
    valid_refresh: Mutex<String>,
    rotate: bool,
    seen_bearers: Mutex<Vec<String>>,
}

impl TestBackend {
    fn new(valid_token: &str, valid_refresh: &str, rotate: bool) -> Arc<Self> {
        Arc::new(Self {
            refresh_calls: AtomicUsize::new(0),
            valid_token: Mutex::new(valid_token.to_string()),
            valid_refresh: Mutex::new(valid_refresh.to_string()),
            rotate,
            seen_bearers: Mutex::new(Vec::new()),
        })
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

async fn widgets(
    State(state): State<Arc<TestBackend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.seen_bearers.lock().unwrap().push(bearer.clone());
    let expected = format!("Bearer {}", state.valid_token.lock().unwrap());
    if bearer == expected {
        (StatusCode::OK, Json(json!({ "ok": true })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "token expired" })),
        )
    }
}

async fn always_401() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "forbidden resource" })),
    )
}

async fn report(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "window_days": params.get("days") }))
}

async fn broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "boom" })),
    )
}

async fn refresh(
    State(state): State<Arc<TestBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Long enough that requests failing while an exchange is in flight
    // park on the coordinator instead of starting their own.
    tokio::time::sleep(Duration::from_millis(150)).await;

    let presented = body["refresh_token"].as_str().unwrap_or_default();
    let valid = state.valid_refresh.lock().unwrap().clone();
    if presented != valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "invalid refresh token" })),
        );
    }

    *state.valid_token.lock().unwrap() = "T2".to_string();
    if state.rotate {
        *state.valid_refresh.lock().unwrap() = "R2".to_string();
        (
            StatusCode::OK,
            Json(json!({ "access_token": "T2", "refresh_token": "R2" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "access_token": "T2" })))
    }
}

async fn spawn_backend(state: Arc<TestBackend>) -> String {
    let app = Router::new()
        .route("/api/v1/widgets", get(widgets))
        .route("/api/v1/always-401", get(always_401))
        .route("/api/v1/report", get(report))
        .route("/api/v1/broken", get(broken))
        .route("/api/v1/auth/refresh", post(refresh))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str, terminal_count: Arc<AtomicUsize>) -> ApiClient {
    let config = ClientConfig::new(base_url).with_auth_terminal_hook(Box::new(move || {
        terminal_count.fetch_add(1, Ordering::SeqCst);
    }));
    ApiClient::new(config).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn valid_token_skips_refresh() {
    let backend = TestBackend::new("T1", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let value: Value = client.get("/api/v1/widgets").await.unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(backend.refresh_calls(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn query_pairs_reach_the_server() {
    let backend = TestBackend::new("T1", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();

    let value: Value = client
        .get_with_query(
            "/api/v1/report",
            vec![("days".to_string(), "30".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(value["window_days"], "30");
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_token_is_refreshed_and_request_retried() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let value: Value = client.get("/api/v1/widgets").await.unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(client.store().access_token().unwrap().as_deref(), Some("T2"));

    let bearers = backend.seen_bearers.lock().unwrap().clone();
    assert_eq!(bearers, vec!["Bearer T1", "Bearer T2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_401s_trigger_exactly_one_refresh() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = Arc::new(client_for(&base, Arc::new(AtomicUsize::new(0))));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let tasks = (0..3).map(|_| {
        let client = client.clone();
        async move { client.get::<Value>("/api/v1/widgets").await }
    });
    let results = futures::future::join_all(tasks).await;

    for result in results {
        assert_eq!(result.unwrap()["ok"], true);
    }
    assert_eq!(backend.refresh_calls(), 1);

    // Every retry carried the renewed token.
    let bearers = backend.seen_bearers.lock().unwrap().clone();
    assert_eq!(bearers.iter().filter(|b| *b == "Bearer T1").count(), 3);
    assert_eq!(bearers.iter().filter(|b| *b == "Bearer T2").count(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_refresh_token_ends_session_without_exchange() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let terminal = Arc::new(AtomicUsize::new(0));
    let client = client_for(&base, terminal.clone());
    client.store().set_access_token("T1").unwrap();
    // no refresh token stored

    let result = client.get::<Value>("/api/v1/widgets").await;
    // The original 401 propagates unchanged.
    match result {
        Err(ApiError::Status { status: 401, .. }) => {}
        other => panic!("expected 401 status error, got {other:?}"),
    }
    assert_eq!(backend.refresh_calls(), 0);
    assert_eq!(terminal.load(Ordering::SeqCst), 1);
    assert!(client.store().access_token().unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_exchange_fails_all_waiters_and_recovers() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let terminal = Arc::new(AtomicUsize::new(0));
    let client = Arc::new(client_for(&base, terminal.clone()));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R-revoked").unwrap();

    let tasks = (0..3).map(|_| {
        let client = client.clone();
        async move { client.get::<Value>("/api/v1/widgets").await }
    });
    let results = futures::future::join_all(tasks).await;

    for result in results {
        match result {
            Err(ApiError::RefreshFailed(_)) => {}
            other => panic!("expected refresh failure, got {other:?}"),
        }
    }
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(terminal.load(Ordering::SeqCst), 1);
    assert!(client.store().refresh_token().unwrap().is_none());

    // The coordinator is idle again: a later session refreshes normally.
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();
    let value: Value = client.get("/api/v1/widgets").await.unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(backend.refresh_calls(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn abandoned_caller_does_not_wedge_the_coordinator() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = Arc::new(client_for(&base, Arc::new(AtomicUsize::new(0))));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    // Drop the request that started the exchange while the exchange is
    // still in flight.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(40),
        client.get::<Value>("/api/v1/widgets"),
    )
    .await;
    assert!(abandoned.is_err());

    // The exchange finishes on its own and later requests go through; a
    // wedged coordinator would park this one forever.
    let value = tokio::time::timeout(
        Duration::from_secs(3),
        client.get::<Value>("/api/v1/widgets"),
    )
    .await
    .expect("request after an abandoned caller should complete")
    .unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn retried_request_is_never_retried_twice() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    // The endpoint rejects even a fresh token: the exchange runs once and
    // the second 401 propagates instead of looping.
    let result = client.get::<Value>("/api/v1/always-401").await;
    match result {
        Err(ApiError::Status { status: 401, .. }) => {}
        other => panic!("expected 401 status error, got {other:?}"),
    }
    assert_eq!(backend.refresh_calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn rotated_refresh_token_replaces_stored_one() {
    let backend = TestBackend::new("T2", "R1", true);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let _: Value = client.get("/api/v1/widgets").await.unwrap();
    assert_eq!(client.store().access_token().unwrap().as_deref(), Some("T2"));
    assert_eq!(client.store().refresh_token().unwrap().as_deref(), Some("R2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_rotating_exchange_keeps_stored_refresh_token() {
    let backend = TestBackend::new("T2", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(&base, Arc::new(AtomicUsize::new(0)));
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let _: Value = client.get("/api/v1/widgets").await.unwrap();
    assert_eq!(client.store().refresh_token().unwrap().as_deref(), Some("R1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_401_errors_bypass_the_refresh_path() {
    let backend = TestBackend::new("T1", "R1", false);
    let base = spawn_backend(backend.clone()).await;
    let terminal = Arc::new(AtomicUsize::new(0));
    let client = client_for(&base, terminal.clone());
    client.store().set_access_token("T1").unwrap();
    client.store().set_refresh_token("R1").unwrap();

    let result = client.get::<Value>("/api/v1/broken").await;
    match result {
        Err(ApiError::Status { status: 500, .. }) => {}
        other => panic!("expected 500 status error, got {other:?}"),
    }
    assert_eq!(backend.refresh_calls(), 0);
    assert_eq!(terminal.load(Ordering::SeqCst), 0);
    // The session is untouched.
    assert_eq!(client.store().access_token().unwrap().as_deref(), Some("T1"));
}
