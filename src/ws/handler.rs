//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::lobby::{LobbyEvent, LobbyHandle, OUTBOUND_CAPACITY};
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.lobby))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, lobby: LobbyHandle) {
    let connection_id = Uuid::new_v4();
    info!(connection_id = %connection_id, "New WebSocket connection");

    let (ws_sink, ws_stream) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);

    if !lobby.send(LobbyEvent::Connected {
        connection_id,
        outbound: outbound_tx,
    }) {
        error!(connection_id = %connection_id, "Lobby is gone, dropping connection");
        return;
    }

    run_session(connection_id, ws_sink, ws_stream, outbound_rx, &lobby).await;

    lobby.send(LobbyEvent::Disconnected { connection_id });
    info!(connection_id = %connection_id, "WebSocket connection closed");
}

/// Pump lobby messages out and client messages in until either side closes
async fn run_session(
    connection_id: Uuid,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    mut outbound_rx: mpsc::Receiver<ServerMsg>,
    lobby: &LobbyHandle,
) {
    let rate_limiter = ConnectionRateLimiter::new();

    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(connection_id = %connection_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check() {
                    warn!(connection_id = %connection_id, "Rate limited client message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => {
                        if !lobby.send(LobbyEvent::Client { connection_id, msg }) {
                            debug!(connection_id = %connection_id, "Lobby channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(connection_id = %connection_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(connection_id = %connection_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

async fn send_msg(sink: &mut SplitSink<WebSocket, Message>, msg: &ServerMsg) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
