use bridge::cli::{ConfigCommand, Credentials, FileCommand};
use bridge::commands::{self, Context};
use bridge::error::BridgeError;

use client_core::{ClientConfig, EditorClient};

use tempfile::TempDir;

/// **VALUE**: A fresh config directory yields defaults and `config init` writes them.
#[test]
fn given_empty_config_dir_when_init_run_then_writes_default_file() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().unwrap();
    let context = Context::load(Some(dir.path().to_path_buf()), None).unwrap();
    assert_eq!(context.config, ClientConfig::default());

    // WHEN: Running config init
    commands::config::run(&context, ConfigCommand::Init).unwrap();

    // THEN: The file exists and loads back as defaults
    assert!(ClientConfig::file_path(dir.path()).exists());
    assert_eq!(
        ClientConfig::load(dir.path()).unwrap(),
        ClientConfig::default()
    );
}

/// **BUG THIS CATCHES**: A `--base-url` override bypassing validation and failing only
/// when the socket is dialled.
#[test]
fn given_http_base_url_override_when_context_loaded_then_returns_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Context::load(
        Some(dir.path().to_path_buf()),
        Some("http://localhost:8080".to_string()),
    );

    assert!(matches!(result, Err(BridgeError::Config { .. })));
}

#[test]
fn given_base_url_override_when_client_built_then_dials_override() {
    let dir = TempDir::new().unwrap();
    let context = Context::load(
        Some(dir.path().to_path_buf()),
        Some("ws://10.1.2.3:9000".to_string()),
    )
    .unwrap();

    let client: EditorClient = context.client().unwrap();

    assert_eq!(client.socket_url().as_str(), "ws://10.1.2.3:9000/ws/vsc");
}

/// **VALUE**: File commands map onto editor operations and queue while offline.
#[test]
fn given_file_commands_when_dispatched_offline_then_each_is_queued() {
    // GIVEN: A disconnected editor client
    let client = EditorClient::new("ws://127.0.0.1:9").unwrap();
    let operations = [
        FileCommand::List { path: None },
        FileCommand::Read {
            path: "a".to_string(),
        },
        FileCommand::Search {
            query: "b".to_string(),
        },
    ];

    // WHEN: Dispatching each one
    for operation in &operations {
        commands::file::dispatch(&client, operation);
    }

    // THEN: All are waiting for the next connection
    assert_eq!(client.queued_len(), operations.len());
}

/// **BUG THIS CATCHES**: Connecting with neither a token nor a username/password and
/// only failing later with a confusing socket error.
#[tokio::test]
async fn given_no_credentials_when_establishing_then_returns_bridge_error() {
    let client = EditorClient::new("ws://127.0.0.1:9").unwrap();

    let result = commands::establish(&client, &Credentials::default()).await;

    assert!(matches!(result, Err(BridgeError::Bridge { .. })));
    assert!(!client.is_connected());
}
