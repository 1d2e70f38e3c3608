//! Test helpers for connection integration tests.
//!
//! Runs a real websocket server on an ephemeral port and hands each accepted
//! socket, together with the path it was opened on, to the test.

use client_core::ConnectionSettings;

use models::Message;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};

pub const TEST_TOKEN: &str = "test-session-token";
pub const WAIT: Duration = Duration::from_secs(5);

/// Reconnect schedule short enough for real-time tests.
pub fn fast_settings() -> ConnectionSettings {
    ConnectionSettings {
        initial_reconnect_delay: Duration::from_millis(50),
        max_reconnect_delay: Duration::from_millis(200),
        ..ConnectionSettings::default()
    }
}

pub struct TestServer {
    addr: SocketAddr,
    connections: mpsc::UnboundedReceiver<ServerConnection>,
    accept_task: JoinHandle<()>,
}

pub struct ServerConnection {
    pub path: String,
    ws: WebSocketStream<TcpStream>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("No local address");
        let (tx, connections) = mpsc::unbounded_channel();

        let accept_task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let path = Arc::new(Mutex::new(String::new()));
                    let captured = Arc::clone(&path);
                    let callback = move |request: &Request, response: Response| {
                        *captured.lock().unwrap() = request.uri().path().to_string();
                        Ok::<Response, ErrorResponse>(response)
                    };
                    if let Ok(ws) = accept_hdr_async(stream, callback).await {
                        let path = path.lock().unwrap().clone();
                        let _ = tx.send(ServerConnection { path, ws });
                    }
                });
            }
        });

        Self {
            addr,
            connections,
            accept_task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub async fn next_connection(&mut self) -> ServerConnection {
        timeout(WAIT, self.connections.recv())
            .await
            .expect("Timed out waiting for a client connection")
            .expect("Test server stopped")
    }

    pub async fn expect_no_connection(&mut self, within: Duration) {
        if let Ok(Some(connection)) = timeout(within, self.connections.recv()).await {
            panic!("Unexpected connection on {}", connection.path);
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

impl ServerConnection {
    /// Next text frame, decoded.
    pub async fn next_message(&mut self) -> Message {
        loop {
            let frame = timeout(WAIT, self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Socket ended")
                .expect("Socket error");
            if let WsMessage::Text(text) = frame {
                return Message::from_frame(text.as_str()).expect("Client sent invalid JSON");
            }
        }
    }

    /// Consume the handshake frame and return its token.
    pub async fn expect_auth(&mut self) -> String {
        match self.next_message().await {
            Message::Auth(auth) => auth.token,
            other => panic!("Expected auth frame first, got {other:?}"),
        }
    }

    pub async fn send(&mut self, message: &Message) {
        let frame = message.to_frame().expect("Failed to serialize");
        self.send_raw(&frame).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(WsMessage::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Whether the client closed this socket within `within`.
    ///
    /// Keeps reading after the close frame so the reply is flushed and the
    /// client sees the handshake complete.
    pub async fn closed_by_client(&mut self, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        let mut saw_close = false;
        loop {
            match tokio::time::timeout_at(deadline, self.ws.next()).await {
                Err(_) => return saw_close,
                Ok(None) | Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(WsMessage::Close(_)))) => saw_close = true,
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// Collects events from client handlers so tests can await them.
pub fn channel<T>() -> (mpsc::UnboundedSender<T>, mpsc::UnboundedReceiver<T>) {
    mpsc::unbounded_channel()
}

pub async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(WAIT, rx.recv())
        .await
        .expect("Timed out waiting for handler")
        .expect("Handler channel closed")
}

/// An address nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("ws://{addr}")
}
