use crate::config::ClientConfig;
use crate::connection::ConnectionSettings;
use crate::error::config::ConfigError;

use std::time::Duration;

use tempfile::TempDir;

/// **VALUE**: A first run without a config file still starts with sane settings.
///
/// **BUG THIS CATCHES**: Treating a missing file as an error and refusing to start.
#[test]
fn given_missing_file_when_load_called_then_returns_defaults() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().unwrap();

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).unwrap();

    // THEN: Defaults are returned
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.server.base_url, "ws://localhost:8080");
    assert_eq!(config.reconnect.max_attempts, 5);
}

/// **VALUE**: Saved settings come back unchanged.
///
/// **BUG THIS CATCHES**: Serde attributes that write a key under one name and read it
/// under another, silently resetting a user's settings on restart.
#[test]
fn given_saved_config_when_loaded_then_values_round_trip() {
    // GIVEN: A customised config saved to disk
    let dir = TempDir::new().unwrap();
    let mut config = ClientConfig::default();
    config.server.base_url = "wss://bridge.example.com".to_string();
    config.queue.capacity = Some(64);
    config.reconnect.max_attempts = 8;
    config.save(dir.path()).unwrap();

    // WHEN: Loading it again
    let loaded = ClientConfig::load(dir.path()).unwrap();

    // THEN: Nothing changed and no temp file is left behind
    assert_eq!(loaded, config);
    assert!(!dir.path().join("bridge.toml.tmp").exists());
}

/// **VALUE**: Users can write a partial file containing only what they change.
#[test]
fn given_partial_toml_when_loaded_then_missing_sections_use_defaults() {
    // GIVEN: A file that only sets the server address
    let dir = TempDir::new().unwrap();
    std::fs::write(
        ClientConfig::file_path(dir.path()),
        "[server]\nbase_url = \"ws://10.0.0.5:9000\"\n",
    )
    .unwrap();

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).unwrap();

    // THEN: Server is overridden, everything else is default
    assert_eq!(config.server.base_url, "ws://10.0.0.5:9000");
    assert_eq!(config.monitor.interval_ms, 1000);
    assert_eq!(config.queue.capacity, None);
}

#[test]
fn given_corrupt_toml_when_loaded_then_returns_parse_error() {
    // GIVEN: A file that is not TOML
    let dir = TempDir::new().unwrap();
    std::fs::write(ClientConfig::file_path(dir.path()), "server = [[[").unwrap();

    // WHEN / THEN
    assert!(matches!(
        ClientConfig::load(dir.path()),
        Err(ConfigError::ParseError { .. })
    ));
}

/// **BUG THIS CATCHES**: Accepting an `http://` base address, which would make every
/// socket open fail at runtime instead of at startup.
#[test]
fn given_http_base_url_when_validated_then_returns_validation_error() {
    // GIVEN: An HTTP base address
    let mut config = ClientConfig::default();
    config.server.base_url = "http://localhost:8080".to_string();

    // WHEN / THEN
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_inverted_backoff_bounds_when_validated_then_returns_validation_error() {
    let mut config = ClientConfig::default();
    config.reconnect.initial_delay_ms = 5000;
    config.reconnect.max_delay_ms = 1000;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_zero_queue_capacity_when_validated_then_returns_validation_error() {
    let mut config = ClientConfig::default();
    config.queue.capacity = Some(0);

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_config_when_converted_to_settings_then_durations_match() {
    // GIVEN: A config with non-default timings
    let mut config = ClientConfig::default();
    config.reconnect.initial_delay_ms = 250;
    config.reconnect.max_delay_ms = 4000;
    config.http.timeout_secs = 5;

    // WHEN: Converting to connection settings
    let settings = ConnectionSettings::from(&config);

    // THEN: Milliseconds and seconds are mapped to durations
    assert_eq!(settings.initial_reconnect_delay, Duration::from_millis(250));
    assert_eq!(settings.max_reconnect_delay, Duration::from_millis(4000));
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert_eq!(settings.max_reconnect_attempts, 5);
}
