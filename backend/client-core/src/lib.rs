//! Session, connection and publishing logic for the bridge.
//!
//! A [`Client`](connection::Client) exchanges credentials for a session token,
//! opens one role-specific websocket, authenticates on it, and keeps it alive
//! with bounded exponential backoff. Messages sent while offline wait in a
//! FIFO queue and are flushed after the next successful open.
//!
//! ```no_run
//! use client_core::connection::EditorClient;
//! use common::RedactedSecret;
//!
//! # async fn run() -> Result<(), client_core::error::CoreError> {
//! let client = EditorClient::new("ws://localhost:8080")?;
//! client.on_message(|message| println!("received {}", message.kind()));
//! client
//!     .authenticate("alice", &RedactedSecret::new("hunter2"))
//!     .await?;
//! client.connect().await?;
//! client.read_file("src/App.tsx");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod connection;
pub mod error;
pub mod monitor;

#[cfg(test)]
mod tests;

pub use auth::SessionToken;
pub use config::ClientConfig;
pub use connection::{
    CanvasClient, Client, ConnectionSettings, ConnectionState, EditorClient, HandlerId,
};
pub use monitor::{Monitor, WhiteboardPublisher};

pub const AUTH_ENDPOINT: &str = "/auth";
pub const SOCKET_PATH_PREFIX: &str = "/ws";
pub const EDITOR_SOCKET_PATH: &str = const_format::concatcp!(SOCKET_PATH_PREFIX, "/vsc");
pub const CANVAS_SOCKET_PATH: &str = const_format::concatcp!(SOCKET_PATH_PREFIX, "/excalidraw");
pub const DEFAULT_BASE_URL: &str = "ws://localhost:8080";
