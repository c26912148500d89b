//! Live notification feed over WebSocket.
//!
//! Every connected client receives every notification published on the
//! broadcast bus, serialized as `{"event": ..., "payload": ...}`.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::adapters::http::AppState;
use crate::adapters::notifications::BroadcastNotificationBus;
use crate::domain::notification::Notification;

/// GET /api/notifications/ws
pub async fn feed_handler(
    ws: WebSocketUpgrade,
    State(feed): State<BroadcastNotificationBus>,
) -> Response {
    // Subscribe before the upgrade so nothing published in between is missed.
    let events = feed.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

async fn handle_socket(socket: WebSocket, mut events: broadcast::Receiver<Notification>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let notification = match events.recv().await {
                Ok(n) => n,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "feed client lagging, notifications dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let json = match serde_json::to_string(&notification) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(event = notification.name(), error = %e, "notification not serializable");
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(json)).await {
                tracing::debug!("feed send error, closing connection: {}", e);
                break;
            }
        }
    });

    // The feed is one-way; inbound frames only signal liveness or close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("feed receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    tracing::debug!("feed client disconnected");
}

pub fn feed_routes() -> Router<AppState> {
    Router::new().route("/notifications/ws", get(feed_handler))
}
