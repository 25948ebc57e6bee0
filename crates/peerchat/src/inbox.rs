use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json, Router, routing};
use defs::{ChatMessage, DeliveryForm};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::app::AppEvent;

#[derive(Clone)]
struct InboxState {
    events: mpsc::UnboundedSender<AppEvent>,
}

/// HTTP endpoint other peers deliver chat lines to.
pub struct Inbox {
    router: Router,
}

impl Inbox {
    /// Every accepted delivery is forwarded as [`AppEvent::Inbound`].
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let router = Router::new()
            .route("/send-peer", routing::post(receive))
            .layer(TraceLayer::new_for_http())
            .with_state(InboxState { events });

        Self { router }
    }

    /// Serve until the listener fails.
    ///
    /// # Errors
    /// Returns an error if the server fails.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        axum::serve(listener, self.router).await
    }
}

async fn receive(
    State(state): State<InboxState>,
    Form(form): Form<DeliveryForm>,
) -> impl IntoResponse {
    let message = ChatMessage::from(form);
    debug!(from = %message.sender, "message received");

    if state.events.send(AppEvent::Inbound(message)).is_err() {
        return (StatusCode::SERVICE_UNAVAILABLE, "ui closed").into_response();
    }
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
