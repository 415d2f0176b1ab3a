//! Mock Dirac Live processor for tests
//!
//! Serves the processor's REST endpoints from in-memory state on a random
//! local port. Tests can inject failures, replace response bodies and
//! inspect every request the mock received.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

pub use axum::http::StatusCode;

/// A request received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub endpoint: String,
    pub query: Option<String>,
}

/// In-memory processor state plus test hooks.
#[derive(Debug, Clone)]
pub struct ApplianceState {
    pub slots: Vec<Value>,
    pub active_slot: i64,
    /// Raw wire value; the real processor reports 0 or 1.
    pub enabled: i64,
    pub gain: f64,
    pub limits: Value,
    /// When set, every endpoint answers with this status.
    pub fail_with: Option<StatusCode>,
    /// Body served verbatim for GET on the given endpoint (e.g. `"speaker"`).
    pub raw_bodies: HashMap<String, String>,
    pub requests: Vec<RecordedRequest>,
}

impl Default for ApplianceState {
    fn default() -> Self {
        Self {
            slots: vec![
                sample_slot(0, "Ojas1", "Dirac Live Bass Control", false),
                sample_slot(1, "Movies", "Dirac Live", true),
            ],
            active_slot: 0,
            enabled: 1,
            gain: 0.0,
            limits: json!({"max": 0.0, "min": -50.0, "step": 0.5, "units": ""}),
            fail_with: None,
            raw_bodies: HashMap::new(),
            requests: Vec::new(),
        }
    }
}

/// Build a slot object in the processor's wire format.
pub fn sample_slot(index: i64, name: &str, filter_type: &str, is_trial: bool) -> Value {
    json!({
        "description": "",
        "filter_type": filter_type,
        "gains_delays": [
            {"delay_ms": 217.438, "gain_db": -1.57, "index": 0},
            {"delay_ms": 0.0, "gain_db": -8.36, "index": 1}
        ],
        "index": index,
        "is_trial": is_trial,
        "name": name,
        "path": format!("/filters/multi/custom_2_2/{}", index)
    })
}

impl ApplianceState {
    /// Record the request and short-circuit with an injected response if one applies.
    fn intercept(&mut self, method: &str, endpoint: &str, query: Option<String>) -> Option<Response> {
        self.requests.push(RecordedRequest {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            query,
        });

        if let Some(status) = self.fail_with {
            return Some((status, "injected failure").into_response());
        }

        if method == "GET" {
            if let Some(body) = self.raw_bodies.get(endpoint) {
                return Some(
                    ([(header::CONTENT_TYPE, "application/json")], body.clone()).into_response(),
                );
            }
        }

        None
    }
}

type SharedState = Arc<Mutex<ApplianceState>>;

/// A running mock processor. The server shuts down when this is dropped.
pub struct MockAppliance {
    addr: SocketAddr,
    state: SharedState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockAppliance {
    /// Start a mock with the default two-slot state.
    pub async fn start() -> std::io::Result<Self> {
        Self::with_state(ApplianceState::default()).await
    }

    pub async fn with_state(initial: ApplianceState) -> std::io::Result<Self> {
        let state = Arc::new(Mutex::new(initial));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> ApplianceState {
        self.state.lock().await.clone()
    }

    /// Mutate the state in place, e.g. to inject a failure.
    pub async fn update<F: FnOnce(&mut ApplianceState)>(&self, f: F) {
        let mut guard = self.state.lock().await;
        f(&mut guard);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

impl Drop for MockAppliance {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/list-slots", get(list_slots))
        .route("/active-slot", get(get_active_slot).put(put_active_slot))
        .route("/filtering", get(get_filtering).put(put_filtering))
        .route("/limits/speaker", get(get_speaker_limits))
        .route("/speaker", get(get_speaker).put(put_speaker))
        .with_state(state)
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, msg.to_string()).into_response()
}

async fn list_slots(State(state): State<SharedState>, RawQuery(raw): RawQuery) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("GET", "list-slots", raw) {
        return resp;
    }
    Json(Value::Array(state.slots.clone())).into_response()
}

async fn get_active_slot(State(state): State<SharedState>, RawQuery(raw): RawQuery) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("GET", "active-slot", raw) {
        return resp;
    }
    Json(json!({"index": state.active_slot})).into_response()
}

async fn put_active_slot(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("PUT", "active-slot", raw) {
        return resp;
    }
    match params.get("index").and_then(|v| v.parse::<i64>().ok()) {
        Some(index) => {
            state.active_slot = index;
            StatusCode::OK.into_response()
        }
        None => bad_request("missing or invalid 'index'"),
    }
}

async fn get_filtering(State(state): State<SharedState>, RawQuery(raw): RawQuery) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("GET", "filtering", raw) {
        return resp;
    }
    Json(json!({"enabled": state.enabled})).into_response()
}

async fn put_filtering(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("PUT", "filtering", raw) {
        return resp;
    }
    match params.get("enabled").and_then(|v| v.parse::<i64>().ok()) {
        Some(enabled) => {
            state.enabled = enabled;
            StatusCode::OK.into_response()
        }
        None => bad_request("missing or invalid 'enabled'"),
    }
}

async fn get_speaker_limits(State(state): State<SharedState>, RawQuery(raw): RawQuery) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("GET", "limits/speaker", raw) {
        return resp;
    }
    Json(state.limits.clone()).into_response()
}

async fn get_speaker(State(state): State<SharedState>, RawQuery(raw): RawQuery) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("GET", "speaker", raw) {
        return resp;
    }
    Json(json!({"gain": state.gain})).into_response()
}

async fn put_speaker(
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().await;
    if let Some(resp) = state.intercept("PUT", "speaker", raw) {
        return resp;
    }
    match params.get("gain").and_then(|v| v.parse::<f64>().ok()) {
        Some(gain) => {
            state.gain = gain;
            StatusCode::OK.into_response()
        }
        None => bad_request("missing or invalid 'gain'"),
    }
}
