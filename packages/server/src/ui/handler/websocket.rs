//! WebSocket connection handlers.

use std::{fmt::Display, sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, PushEvent},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to generate connection id: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id)))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket.
///
/// Each send is bounded by `send_timeout`; a send that times out or fails ends
/// the task, which in turn terminates the connection.
fn pusher_loop<S>(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: S,
    send_timeout: Duration,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(send_timeout, sender.send(Message::Text(msg.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!("Failed to send to '{}': {}", connection_id, e);
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        "Send to '{}' timed out after {:?}, dropping connection",
                        connection_id,
                        send_timeout
                    );
                    break;
                }
            }
        }
    })
}

/// Send an error notice to this connection only.
async fn notify_error(state: &AppState, connection_id: &ConnectionId, message: String) {
    let event = PushEvent::Error { message };
    if let Err(e) = state.message_pusher.push_to(connection_id, &event).await {
        tracing::warn!("Failed to send error notice to '{}': {}", connection_id, e);
    }
}

async fn handle_client_message(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Invalid message from '{}': {}", connection_id, e);
            notify_error(state, connection_id, format!("Invalid message: {}", e)).await;
            return;
        }
    };

    match message {
        ClientMessage::JoinPoll { poll_id } => {
            if let Err(e) = state
                .join_poll_usecase
                .execute(poll_id.clone(), connection_id)
                .await
            {
                tracing::warn!(
                    "Connection '{}' failed to join poll '{}': {}",
                    connection_id,
                    poll_id,
                    e
                );
                notify_error(state, connection_id, e.to_string()).await;
            }
        }
        ClientMessage::LeavePoll { poll_id } => {
            if let Err(e) = state
                .leave_poll_usecase
                .execute(poll_id, connection_id)
                .await
            {
                notify_error(state, connection_id, e.to_string()).await;
            }
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, receiver) = socket.split();

    // Create the outbound queue and register the connection
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_participant_usecase
        .execute(connection_id.clone(), tx)
        .await;

    run_session(sender, receiver, rx, state, connection_id).await;
}

/// Drive one registered connection until either direction ends, then clean up.
async fn run_session<S, R>(
    sender: S,
    mut receiver: R,
    rx: mpsc::UnboundedReceiver<String>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!(
                        "Received from '{}': {}",
                        connection_id_clone,
                        text.as_str()
                    );
                    handle_client_message(&state_clone, &connection_id_clone, text.as_str())
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to drain the outbound queue into this client
    let mut send_task = pusher_loop(rx, sender, state.send_timeout, connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // leave_all + unregister + presence rebroadcast, whichever side ended first
    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}
