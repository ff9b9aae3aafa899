use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use util::{state::AppState, ws::WebSocketManager};

use crate::auth::AuthUser;

/// Topic carrying live attendance events for one section.
pub fn section_topic(section_id: i64) -> String {
    format!("attendance:section:{section_id}")
}

/// Payload broadcast when a scan is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMarked {
    pub record_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub section_id: i64,
    pub section_name: String,
    pub session_id: String,
    pub course_code: String,
    pub attended_at: String,
}

/// Broadcast an `attendance_marked` event on the section topic. Best-effort;
/// never affects the write that triggered it.
pub async fn attendance_marked(ws: &WebSocketManager, payload: &AttendanceMarked) {
    let topic = section_topic(payload.section_id);
    util::ws::emit(ws, &topic, "attendance_marked", payload).await;
}

/// GET `/ws/sections/{section_id}`
///
/// Upgrades to a WebSocket subscribed to the section's attendance topic and
/// forwards every broadcast until the client disconnects.
///
/// **Auth**: any authenticated user.
pub async fn section_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(section_id): Path<i64>,
) -> impl IntoResponse {
    let manager = state.ws_clone();
    ws.on_upgrade(move |socket| serve_section_socket(socket, manager, section_id))
}

async fn serve_section_socket(socket: WebSocket, manager: WebSocketManager, section_id: i64) {
    let mut rx = manager.subscribe(&section_topic(section_id)).await;
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            broadcast = rx.recv() => match broadcast {
                Ok(msg) => {
                    if sink.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                // A lagged receiver skips missed events and keeps going.
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => continue,
            },
        }
    }
}
