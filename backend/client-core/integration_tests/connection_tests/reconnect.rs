use crate::connection_tests::helpers::{
    TEST_TOKEN, TestServer, channel, fast_settings, recv, unreachable_base_url,
};

use client_core::error::ConnectionError;
use client_core::{ConnectionSettings, EditorClient};

use models::{FileOperation, Message};

use std::time::Duration;

/// **VALUE**: A server-side drop is healed automatically, with a fresh auth frame.
///
/// **WHY THIS MATTERS**: Worker restarts are routine; the editor must come back without
/// user action.
///
/// **BUG THIS CATCHES**: Reconnecting without re-sending `auth`, or never reconnecting.
#[tokio::test]
async fn given_server_closes_socket_when_backoff_elapses_then_client_reconnects_and_reauths() {
    // GIVEN: A connected client with a short backoff
    let mut server = TestServer::start().await;
    let client = EditorClient::with_settings(&server.base_url(), fast_settings()).unwrap();
    let (connect_tx, mut connect_rx) = channel();
    let (disconnect_tx, mut disconnect_rx) = channel();
    client.on_connect(move || {
        let _ = connect_tx.send(());
    });
    client.on_disconnect(move || {
        let _ = disconnect_tx.send(());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    recv(&mut connect_rx).await;
    let mut first = server.next_connection().await;
    first.expect_auth().await;

    // WHEN: The server drops the socket
    first.close().await;
    recv(&mut disconnect_rx).await;

    // THEN: A new socket arrives and authenticates again
    let mut second = server.next_connection().await;
    assert_eq!(second.path, "/ws/vsc");
    assert_eq!(second.expect_auth().await, TEST_TOKEN);
    recv(&mut connect_rx).await;
    assert!(client.is_connected());
    client.disconnect();
}

/// **VALUE**: Messages sent during an outage arrive on the next socket, after auth.
#[tokio::test]
async fn given_outage_when_messages_sent_then_delivered_after_reconnect() {
    // GIVEN: A connected client whose socket the server drops
    let mut server = TestServer::start().await;
    let slow = ConnectionSettings {
        initial_reconnect_delay: Duration::from_millis(300),
        ..fast_settings()
    };
    let client = EditorClient::with_settings(&server.base_url(), slow).unwrap();
    let (disconnect_tx, mut disconnect_rx) = channel();
    client.on_disconnect(move || {
        let _ = disconnect_tx.send(());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut first = server.next_connection().await;
    first.expect_auth().await;
    first.close().await;
    recv(&mut disconnect_rx).await;

    // WHEN: Sending during the backoff window
    client.read_file("one.txt");
    client.read_file("two.txt");

    // THEN: Both follow the auth frame on the new socket, in order
    let mut second = server.next_connection().await;
    second.expect_auth().await;
    assert_eq!(
        second.next_message().await,
        Message::from(FileOperation::read("one.txt"))
    );
    assert_eq!(
        second.next_message().await,
        Message::from(FileOperation::read("two.txt"))
    );
    client.disconnect();
}

/// **VALUE**: Disconnecting during a backoff wait cancels the pending retry.
///
/// **BUG THIS CATCHES**: Only checking "enabled" when scheduling the retry, not when it
/// fires.
#[tokio::test]
async fn given_pending_retry_when_disconnect_called_then_no_new_socket_opens() {
    // GIVEN: A dropped connection with a retry armed for 300ms later
    let mut server = TestServer::start().await;
    let slow = ConnectionSettings {
        initial_reconnect_delay: Duration::from_millis(300),
        ..fast_settings()
    };
    let client = EditorClient::with_settings(&server.base_url(), slow).unwrap();
    let (disconnect_tx, mut disconnect_rx) = channel();
    client.on_disconnect(move || {
        let _ = disconnect_tx.send(());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut first = server.next_connection().await;
    first.expect_auth().await;
    first.close().await;
    recv(&mut disconnect_rx).await;

    // WHEN: Disconnecting before the retry fires
    client.disconnect();

    // THEN: The retry never reaches the server
    server.expect_no_connection(Duration::from_millis(800)).await;
    assert!(!client.is_connected());
}

/// **VALUE**: Reconnection gives up after the configured number of attempts.
///
/// **WHY THIS MATTERS**: Hosts show a "reconnect manually" prompt on exhaustion; without
/// the signal the UI spins forever.
#[tokio::test]
async fn given_unreachable_server_when_retries_fail_then_reports_connection_exhausted() {
    // GIVEN: A client with two attempts pointed at a closed port
    let base_url = unreachable_base_url().await;
    let settings = ConnectionSettings {
        max_reconnect_attempts: 2,
        initial_reconnect_delay: Duration::from_millis(20),
        max_reconnect_delay: Duration::from_millis(40),
        ..ConnectionSettings::default()
    };
    let client = EditorClient::with_settings(&base_url, settings).unwrap();
    let (exhausted_tx, mut exhausted_rx) = channel();
    let (socket_error_tx, mut socket_error_rx) = channel();
    client.on_error(move |error| match error {
        ConnectionError::ConnectionExhausted { attempts, .. } => {
            let _ = exhausted_tx.send(*attempts);
        }
        ConnectionError::Socket { .. } => {
            let _ = socket_error_tx.send(());
        }
        _ => {}
    });

    // WHEN: The first connect fails and retries run out
    assert!(client.connect_with_token(TEST_TOKEN).await.is_err());

    // THEN: One socket error per attempt (initial + 2 retries), then exhaustion
    for _ in 0..3 {
        recv(&mut socket_error_rx).await;
    }
    assert_eq!(recv(&mut exhausted_rx).await, 2);
    assert!(!client.is_connected());
}
