#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use peerchat::{AppEvent, Config};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// How long a test waits for something that should happen promptly.
pub const PROMPT: Duration = Duration::from_secs(5);

/// Bind to port 0 and return the listener + the OS-assigned port.
pub async fn random_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("TcpListener bind to port 0");
    let port = listener.local_addr().expect("local_addr").port();
    (listener, port)
}

/// A port nothing is listening on.
pub async fn closed_port() -> u16 {
    let (listener, port) = random_listener().await;
    drop(listener);
    port
}

fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move { axum::serve(listener, router).await });
}

/// Config for a client advertised as `host:9001` talking to the tracker on
/// `tracker_port`.
pub fn config(host: &str, tracker_port: u16) -> Config {
    Config::new(host, 9001)
        .and_then(|c| c.with_tracker_base(&format!("http://127.0.0.1:{tracker_port}")))
        .expect("valid config")
        .with_request_timeout(Some(Duration::from_secs(30)))
}

/// `/get-list` body listing local peers on `ports`.
pub fn peer_list_body(ports: &[u16]) -> String {
    let peers: Vec<_> = ports
        .iter()
        .map(|port| serde_json::json!({ "ip": "127.0.0.1", "port": port }))
        .collect();
    serde_json::json!({ "status": "ok", "peers": peers }).to_string()
}

// --- Tracker --------------------------------------------------------------

#[derive(Clone)]
struct TrackerState {
    list_body: Arc<str>,
    submissions: mpsc::UnboundedSender<String>,
    connects: mpsc::UnboundedSender<serde_json::Value>,
}

pub struct MockTracker {
    pub port: u16,
    /// Raw `/submit-info` bodies.
    pub submissions: mpsc::UnboundedReceiver<String>,
    /// `/connect-peer` JSON bodies.
    pub connects: mpsc::UnboundedReceiver<serde_json::Value>,
}

/// A tracker that accepts everything and always answers `/get-list` with
/// `list_body`.
pub async fn spawn_tracker(list_body: impl Into<String>) -> MockTracker {
    let (listener, port) = random_listener().await;
    let (submissions_tx, submissions) = mpsc::unbounded_channel();
    let (connects_tx, connects) = mpsc::unbounded_channel();
    let list_body: String = list_body.into();

    let state = TrackerState {
        list_body: Arc::from(list_body),
        submissions: submissions_tx,
        connects: connects_tx,
    };
    let router = Router::new()
        .route("/submit-info", routing::post(submit_info))
        .route("/get-list", routing::get(get_list))
        .route("/connect-peer", routing::post(connect_peer))
        .with_state(state);
    serve(listener, router);

    MockTracker {
        port,
        submissions,
        connects,
    }
}

/// A tracker that fails every request with 500.
pub async fn spawn_failing_tracker() -> u16 {
    let (listener, port) = random_listener().await;
    let router = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    serve(listener, router);
    port
}

async fn submit_info(State(state): State<TrackerState>, body: String) -> impl IntoResponse {
    let _ = state.submissions.send(body);
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_list(State(state): State<TrackerState>) -> impl IntoResponse {
    state.list_body.to_string()
}

async fn connect_peer(
    State(state): State<TrackerState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let _ = state.connects.send(body);
    Json(serde_json::json!({ "status": "ok" }))
}

// --- Peers ----------------------------------------------------------------

#[derive(Clone, Copy)]
pub enum PeerBehavior {
    Accept,
    Reject,
    /// Never answers.
    Hang,
}

#[derive(Clone)]
struct PeerState {
    behavior: PeerBehavior,
    received: mpsc::UnboundedSender<String>,
}

pub struct MockPeer {
    pub port: u16,
    /// Raw `/send-peer` bodies, recorded before the peer answers.
    pub received: mpsc::UnboundedReceiver<String>,
}

impl MockPeer {
    /// Bodies received so far.
    pub fn drain(&mut self) -> Vec<String> {
        let mut bodies = Vec::new();
        while let Ok(body) = self.received.try_recv() {
            bodies.push(body);
        }
        bodies
    }
}

pub async fn spawn_peer(behavior: PeerBehavior) -> MockPeer {
    let (listener, port) = random_listener().await;
    let (received_tx, received) = mpsc::unbounded_channel();

    let router = Router::new()
        .route("/send-peer", routing::post(send_peer))
        .with_state(PeerState {
            behavior,
            received: received_tx,
        });
    serve(listener, router);

    MockPeer { port, received }
}

async fn send_peer(State(state): State<PeerState>, body: String) -> impl IntoResponse {
    let _ = state.received.send(body);
    match state.behavior {
        PeerBehavior::Accept => StatusCode::OK,
        PeerBehavior::Reject => StatusCode::INTERNAL_SERVER_ERROR,
        PeerBehavior::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::OK
        }
    }
}

// --- App events -----------------------------------------------------------

pub async fn next_event(events: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(PROMPT, events.recv())
        .await
        .expect("event in time")
        .expect("channel open")
}
