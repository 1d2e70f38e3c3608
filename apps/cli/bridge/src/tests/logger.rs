// Unit tests for logger initialization
// The global logger can only be installed once per process, so these tests
// run serially and only one of them installs it.

use crate::error::BridgeError;
use crate::logger::{initialize, initialize_internal};

use std::path::PathBuf;

use log::LevelFilter;
use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Calling initialize() twice is harmless.
///
/// **BUG THIS CATCHES**: Removing the Once/AtomicBool guards, which makes fern fail
/// when a second global logger is set.
#[test]
#[serial]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable log directory
    let dir = TempDir::new().unwrap();

    // WHEN: Initializing twice
    let first = initialize(Some(dir.path()), LevelFilter::Debug);
    let second = initialize(Some(dir.path()), LevelFilter::Debug);

    // THEN: Both succeed
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be a no-op");
}

/// **VALUE**: An unusable log directory is reported, not panicked on.
///
/// **BUG THIS CATCHES**: `fern::log_file()` being unwrapped.
#[test]
#[serial]
fn given_invalid_log_dir_when_initialize_internal_called_then_returns_bridge_error() {
    // GIVEN: A path under a device file
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch (fails before anything is installed)
    let result = initialize_internal(Some(&invalid_dir), LevelFilter::Info);

    // THEN
    assert!(matches!(result, Err(BridgeError::Bridge { .. })));
}
