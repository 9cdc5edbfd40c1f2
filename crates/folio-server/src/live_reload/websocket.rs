//! WebSocket endpoint for live reload.
//!
//! Each connection waits for the next successful rebuild and then pushes an
//! empty text message; the injected page script reloads on any message.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;

use crate::state::AppState;

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let Some(live_reload) = state.live_reload.as_ref() else {
        return;
    };
    let registry = live_reload.registry();
    let mut shutdown = state.shutdown.clone();

    loop {
        let (id, reload) = registry.register();
        tracing::debug!(client = id, clients = registry.len(), "Live reload client waiting");

        tokio::select! {
            fired = reload => {
                if fired.is_err() {
                    break;
                }
                if socket.send(Message::Text(String::new().into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                registry.deregister(id);
                match incoming {
                    // Client chatter is ignored.
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
            _ = shutdown.changed() => {
                registry.deregister(id);
                break;
            }
        }
    }
}
