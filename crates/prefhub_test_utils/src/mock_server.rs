//! In-process stand-in for the PrefHub game server.
//!
//! [`MockGameServer`] binds an ephemeral localhost port, answers every API
//! route with a canned response, and records each request so tests can
//! assert on call order, attribution (bearer token) and payloads.
//!
//! The server runs on its own single-threaded tokio runtime in a background
//! thread, so it can be driven from plain blocking `#[test]` functions. It
//! shuts down when dropped.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A request as the mock server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    /// Bearer token from the `Authorization` header, if any.
    pub bearer: Option<String>,
    /// JSON body (`Null` when empty or not JSON).
    pub body: Value,
}

/// Canned responses.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// Phase reported by `GET /api/games/state`.
    pub final_phase: String,
    /// Token handed out by a successful login.
    pub login_token: String,
    /// Paths that answer with `(status, body)` instead of success.
    pub failures: HashMap<String, (u16, String)>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            final_phase: "GAME_OVER".to_string(),
            login_token: "mock-session-token-0001".to_string(),
            failures: HashMap::new(),
        }
    }
}

impl MockBehavior {
    /// Make `path` fail with `status` and `body`.
    pub fn fail(mut self, path: &str, status: u16, body: &str) -> Self {
        self.failures
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    /// Report `phase` from the state endpoint.
    pub fn final_phase(mut self, phase: &str) -> Self {
        self.final_phase = phase.to_string();
        self
    }
}

#[derive(Clone)]
struct MockState {
    behavior: Arc<MockBehavior>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running mock server. Stops on drop.
pub struct MockGameServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockGameServer {
    /// Start a server that accepts every call and reports `GAME_OVER`.
    #[must_use]
    pub fn start() -> Self {
        Self::with_behavior(MockBehavior::default())
    }

    /// Start a server with custom responses.
    #[must_use]
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            behavior: Arc::new(behavior),
            requests: Arc::clone(&requests),
        };
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock server address"))
                    .expect("report mock server address");

                let app = Router::new().fallback(handle).with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("mock server");
            });
        });

        let addr = addr_rx.recv().expect("mock server failed to start");
        tracing::debug!(%addr, "Mock game server listening");

        Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    /// Base URL to point a client at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }

    /// Requests received for `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Paths of every request received so far, in arrival order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Drop for MockGameServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);
    let request = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(String::from),
        bearer: bearer.clone(),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    };
    state.requests.lock().expect("request log").push(request);

    if let Some((status, body)) = state.behavior.failures.get(&path) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
        return (status, body.clone()).into_response();
    }

    let public = matches!(path.as_str(), "/api/auth/login" | "/api/auth/register");
    if !public && bearer.is_none() {
        return (StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#).into_response();
    }

    let reply = match path.as_str() {
        "/api/auth/login" => json!({ "token": state.behavior.login_token }),
        "/api/auth/register" => json!({ "message": "User registered successfully" }),
        "/api/auth/logout" => json!({ "message": "Logged out successfully" }),
        "/api/games/list" => json!([]),
        "/api/games/state" => json!({
            "gameId": query_param(&uri, "gameId"),
            "phase": state.behavior.final_phase,
        }),
        "/api/games/bid" => json!({ "message": "Bid placed successfully" }),
        "/api/games/exchange" => json!({ "message": "Widow exchanged successfully" }),
        "/api/games/play" | "/api/games/create" | "/api/games/join"
        | "/api/games/next-round" => json!({
            "gameId": request_game_id(&body),
            "phase": "PLAYING",
        }),
        _ => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        reply.to_string(),
    )
        .into_response()
}

fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn request_game_id(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("gameId")?
        .as_str()
        .map(String::from)
}
