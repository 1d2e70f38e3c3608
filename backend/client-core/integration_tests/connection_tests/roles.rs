use crate::connection_tests::helpers::{TEST_TOKEN, TestServer};

use client_core::{CanvasClient, EditorClient};

use models::{
    ClientRole, ClusterCheckRequest, CodeGenContext, CodeGenRequest, ComponentStatus,
    FileOperation, FileOperationKind, Message, StatusUpdate, WhiteboardElementBuilder,
    WhiteboardUpdate,
};

/// **VALUE**: Each role dials its own socket path.
///
/// **BUG THIS CATCHES**: Both roles sharing one path, which makes the server route
/// whiteboard traffic to the editor.
#[tokio::test]
async fn given_canvas_client_when_connected_then_uses_excalidraw_path() {
    // GIVEN: A server and a canvas client
    let mut server = TestServer::start().await;
    let client = CanvasClient::new(&server.base_url()).unwrap();
    assert_eq!(client.role(), ClientRole::Canvas);

    // WHEN: Connecting
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;

    // THEN: Canvas path and auth first
    assert_eq!(socket.path, "/ws/excalidraw");
    assert_eq!(socket.expect_auth().await, TEST_TOKEN);
}

/// **VALUE**: Editor convenience operations produce the documented frames.
#[tokio::test]
async fn given_editor_client_when_convenience_ops_called_then_server_receives_typed_messages() {
    // GIVEN: A connected editor client
    let mut server = TestServer::start().await;
    let client = EditorClient::new(&server.base_url()).unwrap();
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;

    // WHEN: Using every editor operation
    client.list_files(None);
    client.list_files(Some("src"));
    client.search_files("TODO");
    client.request_cluster_check("c1", "deploy.yaml");
    client.send_status_update("c1", ComponentStatus::Checking, Some("validating"));

    // THEN: Frames arrive typed and in order
    assert_eq!(
        socket.next_message().await,
        Message::from(FileOperation::list(None))
    );
    match socket.next_message().await {
        Message::FileOperation(op) => {
            assert_eq!(op.operation, FileOperationKind::List);
            assert_eq!(op.path.as_deref(), Some("src"));
        }
        other => panic!("Expected file operation, got {other:?}"),
    }
    assert_eq!(
        socket.next_message().await,
        Message::from(FileOperation::search("TODO"))
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(ClusterCheckRequest {
            component_id: "c1".to_string(),
            spec_file: "deploy.yaml".to_string(),
        })
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(
            StatusUpdate::new("c1", ComponentStatus::Checking).with_message("validating")
        )
    );
}

#[tokio::test]
async fn given_canvas_client_when_convenience_ops_called_then_server_receives_typed_messages() {
    // GIVEN: A connected canvas client and one element
    let mut server = TestServer::start().await;
    let client = CanvasClient::new(&server.base_url()).unwrap();
    client.connect_with_token(TEST_TOKEN).await.unwrap();
    let mut socket = server.next_connection().await;
    socket.expect_auth().await;
    let element = WhiteboardElementBuilder::default()
        .with_id("r1")
        .with_kind("rectangle")
        .with_position(10.0, 20.0)
        .build()
        .unwrap();
    let context = CodeGenContext {
        whiteboard_elements: vec![element.clone()],
        files: vec!["src/App.tsx".to_string()],
        component_ids: None,
    };

    // WHEN: Publishing and requesting generation
    client.send_whiteboard_update("c1", vec![element.clone()], Some("aGk=".to_string()));
    client.request_code_generation("make a login form", context.clone(), "c1");

    // THEN: Both frames arrive intact
    assert_eq!(
        socket.next_message().await,
        Message::from(WhiteboardUpdate {
            component_id: "c1".to_string(),
            elements: vec![element],
            screenshot: Some("aGk=".to_string()),
        })
    );
    assert_eq!(
        socket.next_message().await,
        Message::from(CodeGenRequest {
            prompt: "make a login form".to_string(),
            context,
            component_id: "c1".to_string(),
        })
    );
}
