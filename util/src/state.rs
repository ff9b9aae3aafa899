//! Application state container shared across Axum route handlers and services.
//!
//! Holds the database connection and the WebSocket manager. Wrapped in `Clone`
//! and passed into route handlers via Axum's `State<T>` extractor.

use crate::ws::WebSocketManager;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - A global `WebSocketManager` for broadcasting attendance events per section.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and WebSocket manager.
    pub fn new(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self { db, ws }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the internal `WebSocketManager`.
    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned instance of the `WebSocketManager`.
    pub fn ws_clone(&self) -> WebSocketManager {
        self.ws.clone()
    }
}
