use crate::connection_tests::helpers::{
    TEST_TOKEN, TestServer, WAIT, channel, fast_settings, recv, unreachable_base_url,
};

use client_core::error::ConnectionError;
use client_core::{ConnectionState, EditorClient};

use models::{ComponentStatus, FileOperation, Message, StatusUpdate};

use std::time::Duration;

use tokio::time::timeout;

/// **VALUE**: Connecting before authenticating fails fast and opens nothing.
///
/// **WHY THIS MATTERS**: An unauthenticated socket would be dropped by the server and
/// then burn through the whole reconnect budget.
///
/// **BUG THIS CATCHES**: Opening the socket first and discovering the missing token
/// only when the auth frame is built.
#[tokio::test]
async fn given_no_token_when_connect_called_then_fails_without_opening_socket() {
    // GIVEN: A running server and a client that never authenticated
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();

    // WHEN: Connecting
    let result = client.connect().await;

    // THEN: NoSessionToken, no socket reached the server
    assert!(matches!(result, Err(ConnectionError::NoSessionToken { .. })));
    server.expect_no_connection(Duration::from_millis(200)).await;
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

/// **VALUE**: The auth frame is the first thing the server sees on a new socket.
///
/// **BUG THIS CATCHES**: Sending queued or handler-produced frames before `auth`, which
/// the server rejects.
#[tokio::test]
async fn given_token_when_connected_then_first_frame_is_auth_with_token() {
    // GIVEN: A server and a client holding a token
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();

    // WHEN: Connecting with the token
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;

    // THEN: Editor path, auth frame first, connected state
    assert_eq!(socket.path, "/ws/vsc");
    assert_eq!(socket.expect_auth().await, TEST_TOKEN);
    assert!(client.is_connected());
    assert_eq!(client.connection_state(), ConnectionState::Connected);
}

/// **VALUE**: Offline sends are replayed in order after auth and before connect handlers.
///
/// **WHY THIS MATTERS**: File operations depend on each other (create then update);
/// replaying out of order corrupts the workspace.
///
/// **BUG THIS CATCHES**: Reordered flushes, or connect handlers whose sends overtake
/// the queue.
#[tokio::test]
async fn given_messages_sent_offline_when_connected_then_flushed_fifo_before_handler_sends() {
    // GIVEN: Three messages sent while disconnected and a connect handler that sends too
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    client.create_file("a.txt", "one");
    client.update_file("a.txt", "two");
    client.delete_file("a.txt");
    assert_eq!(client.queued_len(), 3);

    let from_handler = client.clone();
    client.on_connect(move || {
        from_handler.send_status_update("c1", ComponentStatus::Ready, None);
    });

    // WHEN: Connecting
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;

    // THEN: auth, create, update, delete, then the handler's status update
    socket.expect_auth().await;
    assert_eq!(
        socket.next_message().await,
        Message::from(FileOperation::create("a.txt", "one"))
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(FileOperation::update("a.txt", "two"))
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(FileOperation::delete("a.txt"))
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(StatusUpdate::new("c1", ComponentStatus::Ready))
    );
    assert_eq!(client.queued_len(), 0);
}

/// **VALUE**: Every message handler receives every inbound message.
#[tokio::test]
async fn given_two_message_handlers_when_server_sends_then_both_receive_it() {
    // GIVEN: A connected client with two message handlers
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    let (first_tx, mut first_rx) = channel();
    let (second_tx, mut second_rx) = channel();
    client.on_message(move |message| {
        let _ = first_tx.send(message.clone());
    });
    client.on_message(move |message| {
        let _ = second_tx.send(message.clone());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;

    // WHEN: The server pushes a status update
    let update = Message::from(
        StatusUpdate::new("c1", ComponentStatus::Loading).with_message("generating"),
    );
    socket.send(&update).await;

    // THEN: Both handlers got it
    assert_eq!(recv(&mut first_rx).await, update);
    assert_eq!(recv(&mut second_rx).await, update);
}

/// **VALUE**: A malformed frame is reported and the connection carries on.
///
/// **BUG THIS CATCHES**: Treating a parse failure as a socket failure and reconnecting,
/// or silently dropping it without telling error handlers.
#[tokio::test]
async fn given_malformed_frame_when_received_then_error_reported_and_connection_survives() {
    // GIVEN: A connected client with error and message handlers
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    let (error_tx, mut error_rx) = channel();
    let (message_tx, mut message_rx) = channel();
    client.on_error(move |error| {
        let _ = error_tx.send(matches!(error, ConnectionError::MessageParse { .. }));
    });
    client.on_message(move |message| {
        let _ = message_tx.send(message.clone());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;

    // WHEN: Garbage arrives, then a valid frame
    socket.send_raw("this is not json").await;
    let update = Message::from(StatusUpdate::new("c1", ComponentStatus::Success));
    socket.send(&update).await;

    // THEN: One parse error, the valid frame still delivered, still connected
    assert!(recv(&mut error_rx).await);
    assert_eq!(recv(&mut message_rx).await, update);
    assert!(client.is_connected());
}

/// **VALUE**: Explicit disconnect closes the socket, forgets the token and stays down.
///
/// **BUG THIS CATCHES**: Auto-reconnect kicking in after a deliberate disconnect.
#[tokio::test]
async fn given_connected_when_disconnect_called_then_closes_and_never_reconnects() {
    // GIVEN: A connected client with fast reconnect settings
    let mut server = TestServer::start().await;
    let client = EditorClient::with_settings(&server.base_url(), fast_settings()).unwrap();
    let (disconnect_tx, mut disconnect_rx) = channel();
    client.on_disconnect(move || {
        let _ = disconnect_tx.send(());
    });
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;

    // WHEN: Disconnecting
    client.disconnect();

    // THEN: Server sees the close, handlers fire, no new socket appears
    assert!(socket.closed_by_client(WAIT).await);
    recv(&mut disconnect_rx).await;
    let mut state = client.subscribe_state();
    timeout(WAIT, state.wait_for(|s| *s == ConnectionState::Disconnected))
        .await
        .expect("Timed out waiting for disconnected state")
        .unwrap();
    server.expect_no_connection(Duration::from_millis(500)).await;
    assert!(!client.has_session_token());

    // THEN: Connecting again requires new credentials
    assert!(matches!(
        client.connect().await,
        Err(ConnectionError::NoSessionToken { .. })
    ));
}

#[tokio::test]
async fn given_disconnected_client_when_sending_then_messages_queue_after_disconnect() {
    // GIVEN: A client that connected and then disconnected
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;
    client.disconnect();

    // WHEN: Sending afterwards
    client.read_file("later.txt");

    // THEN: Queued, nothing lost
    assert_eq!(client.queued_len(), 1);
}

/// **VALUE**: A failed first open is returned to the caller and reported to handlers.
#[tokio::test]
async fn given_unreachable_server_when_connect_called_then_returns_socket_error() {
    // GIVEN: A client pointed at a closed port
    let base_url = unreachable_base_url().await;
    let client = EditorClient::new(&base_url).unwrap();
    let (error_tx, mut error_rx) = channel();
    let (disconnect_tx, mut disconnect_rx) = channel();
    client.on_error(move |error| {
        let _ = error_tx.send(matches!(error, ConnectionError::Socket { .. }));
    });
    client.on_disconnect(move || {
        let _ = disconnect_tx.send(());
    });

    // WHEN: Connecting
    let result = client.connect_with_token(TEST_TOKEN).await;

    // THEN: Socket error returned, error and disconnect handlers ran
    assert!(matches!(result, Err(ConnectionError::Socket { .. })));
    assert!(recv(&mut error_rx).await);
    recv(&mut disconnect_rx).await;
    assert!(!client.is_connected());
    client.disconnect();
}

#[tokio::test]
async fn given_state_subscriber_when_connecting_then_observes_connected() {
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    let mut state = client.subscribe_state();
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);

    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let _socket = server.next_connection().await;

    timeout(WAIT, state.wait_for(|s| *s == ConnectionState::Connected))
        .await
        .expect("Timed out waiting for connected state")
        .unwrap();
}
