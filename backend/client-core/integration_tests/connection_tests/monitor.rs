use crate::connection_tests::helpers::{TEST_TOKEN, TestServer};

use client_core::{CanvasClient, Monitor};

use models::{Message, WhiteboardElementBuilder};

/// **VALUE**: The monitor publishes through a real canvas client onto the socket.
///
/// **BUG THIS CATCHES**: The publisher wiring sending through the wrong role or
/// dropping the screenshot.
#[tokio::test]
async fn given_monitor_over_canvas_client_when_polled_then_server_receives_whiteboard_update() {
    // GIVEN: A connected canvas client wrapped by a monitor
    let mut server = TestServer::start().await;
    let client = CanvasClient::new(&server.base_url()).unwrap();
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;

    let element = WhiteboardElementBuilder::default()
        .with_id("t1")
        .with_kind("text")
        .with_position(0.0, 0.0)
        .with_text("Login")
        .build()
        .unwrap();
    let elements = vec![element.clone()];
    let monitor = Monitor::new(
        client.clone(),
        move || elements.clone(),
        || Some("c2NyZWVu".to_string()),
    );

    // WHEN: Polling twice and forcing once
    assert!(monitor.poll_once("c1"));
    assert!(!monitor.poll_once("c1"));
    monitor.force_update("c1");

    // THEN: Exactly two whiteboard updates reach the server
    for _ in 0..2 {
        match socket.next_message().await {
            Message::WhiteboardUpdate(update) => {
                assert_eq!(update.component_id, "c1");
                assert_eq!(update.elements, vec![element.clone()]);
                assert_eq!(update.screenshot.as_deref(), Some("c2NyZWVu"));
            }
            other => panic!("Expected whiteboard update, got {other:?}"),
        }
    }
}
