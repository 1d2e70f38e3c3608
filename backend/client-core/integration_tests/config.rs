use client_core::config::ClientConfig;
use client_core::error::ConfigError;
use client_core::{ConnectionSettings, EditorClient};

use std::time::Duration;

use tempfile::TempDir;

/// **VALUE**: A hand-written config file drives the client end to end.
///
/// **BUG THIS CATCHES**: Settings that load but never reach the connection layer.
#[test]
fn given_config_file_when_client_built_from_it_then_uses_configured_address() {
    // GIVEN: A config file with a custom server and backoff
    let dir = TempDir::new().unwrap();
    std::fs::write(
        ClientConfig::file_path(dir.path()),
        r#"
version = 1

[server]
base_url = "wss://bridge.example.com"

[reconnect]
max_attempts = 3
initial_delay_ms = 500
max_delay_ms = 8000

[queue]
capacity = 128
"#,
    )
    .unwrap();

    // WHEN: Loading it and building a client
    let config = ClientConfig::load(dir.path()).unwrap();
    let settings = ConnectionSettings::from(&config);
    let client = EditorClient::with_settings(&config.server.base_url, settings.clone()).unwrap();

    // THEN: Settings and socket address reflect the file
    assert_eq!(settings.max_reconnect_attempts, 3);
    assert_eq!(settings.initial_reconnect_delay, Duration::from_millis(500));
    assert_eq!(settings.queue_capacity, Some(128));
    assert_eq!(
        client.socket_url().as_str(),
        "wss://bridge.example.com/ws/vsc"
    );
}

#[test]
fn given_future_version_when_loaded_then_returns_validation_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(ClientConfig::file_path(dir.path()), "version = 99\n").unwrap();

    assert!(matches!(
        ClientConfig::load(dir.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_nested_missing_directory_when_saved_then_creates_it() {
    // GIVEN: A target directory that does not exist yet
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");

    // WHEN: Saving defaults there
    ClientConfig::default().save(&nested).unwrap();

    // THEN: The file exists and loads back
    assert!(ClientConfig::file_path(&nested).exists());
    assert_eq!(
        ClientConfig::load(&nested).unwrap(),
        ClientConfig::default()
    );
}
