//! Mock Caddy admin API for integration tests.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use route_hook::config::AdminConfig;

/// Server name the mock knows about; any other reads back as `null`.
pub const SERVER: &str = "srv0";

/// Server whose inserts answer with Caddy's unknown-object error.
#[allow(dead_code)]
pub const GONE_SERVER: &str = "gone";

#[derive(Debug, Default)]
pub struct MockState {
    pub routes: Vec<Value>,
    pub requests: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock admin API.
pub struct MockAdmin {
    pub port: u16,
    pub state: Shared,
}

impl MockAdmin {
    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".to_string(),
            port: self.port,
            timeout_secs: 5,
        }
    }

    pub fn routes(&self) -> Vec<Value> {
        self.state.lock().unwrap().routes.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

/// A route as Caddy would hold one created without an `@id`.
#[allow(dead_code)]
pub fn legacy_route(host: &str) -> Value {
    json!({
        "match": [{"host": [host]}],
        "handle": [{"handler": "reverse_proxy", "upstreams": [{"dial": "legacy:80"}]}]
    })
}

fn unknown_id(id: &str) -> (StatusCode, String) {
    // Compact spelling, as older Caddy versions emit it.
    (
        StatusCode::NOT_FOUND,
        format!("{{\"error\":\"unknown object ID '{}'\"}}", id),
    )
}

fn record(state: &Shared, line: String) {
    state.lock().unwrap().requests.push(line);
}

async fn get_by_id(State(state): State<Shared>, Path(id): Path<String>) -> (StatusCode, String) {
    record(&state, format!("GET /id/{}", id));
    let guard = state.lock().unwrap();
    match guard.routes.iter().find(|r| r["@id"].as_str() == Some(id.as_str())) {
        Some(route) => (StatusCode::OK, route.to_string()),
        None => unknown_id(&id),
    }
}

async fn delete_by_id(State(state): State<Shared>, Path(id): Path<String>) -> (StatusCode, String) {
    record(&state, format!("DELETE /id/{}", id));
    let mut guard = state.lock().unwrap();
    match guard.routes.iter().position(|r| r["@id"].as_str() == Some(id.as_str())) {
        Some(index) => {
            guard.routes.remove(index);
            (StatusCode::OK, String::new())
        }
        None => unknown_id(&id),
    }
}

async fn get_server(State(state): State<Shared>, Path(server): Path<String>) -> (StatusCode, String) {
    record(&state, format!("GET /config/apps/http/servers/{}/", server));
    if server != SERVER {
        return (StatusCode::OK, "null".to_string());
    }
    let guard = state.lock().unwrap();
    let body = json!({"listen": [":443"], "routes": guard.routes});
    (StatusCode::OK, body.to_string())
}

async fn insert_route(
    State(state): State<Shared>,
    Path((server, index)): Path<(String, usize)>,
    Json(document): Json<Value>,
) -> (StatusCode, String) {
    record(&state, format!("PUT /config/apps/http/servers/{}/routes/{}/", server, index));
    if server == GONE_SERVER {
        return unknown_id(&server);
    }
    if server != SERVER {
        return (
            StatusCode::BAD_REQUEST,
            format!("{{\"error\":\"invalid traversal path at: config/apps/http/servers/{}\"}}", server),
        );
    }
    let mut guard = state.lock().unwrap();
    if index > guard.routes.len() {
        return (StatusCode::BAD_REQUEST, r#"{"error":"index out of range"}"#.to_string());
    }
    guard.routes.insert(index, document);
    (StatusCode::OK, String::new())
}

async fn delete_route(
    State(state): State<Shared>,
    Path((server, index)): Path<(String, usize)>,
) -> (StatusCode, String) {
    record(&state, format!("DELETE /config/apps/http/servers/{}/routes/{}", server, index));
    let mut guard = state.lock().unwrap();
    if index >= guard.routes.len() {
        return (StatusCode::BAD_REQUEST, r#"{"error":"index out of range"}"#.to_string());
    }
    guard.routes.remove(index);
    (StatusCode::OK, String::new())
}

/// Start a mock admin API on an ephemeral port holding `routes`.
pub async fn start_mock_admin(routes: Vec<Value>) -> MockAdmin {
    let state: Shared = Arc::new(Mutex::new(MockState {
        routes,
        requests: Vec::new(),
    }));

    let app = Router::new()
        .route("/id/{id}", get(get_by_id).delete(delete_by_id))
        .route("/config/apps/http/servers/{server}/", get(get_server))
        .route("/config/apps/http/servers/{server}/routes/{index}/", put(insert_route))
        .route("/config/apps/http/servers/{server}/routes/{index}", delete(delete_route))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockAdmin { port, state }
}

/// A listener that completes TCP handshakes in the kernel but never reads
/// or answers. Keep the returned listener alive for the test's duration.
#[allow(dead_code)]
pub async fn silent_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
