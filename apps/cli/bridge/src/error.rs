use client_core::error::{AuthError, ConfigError, ConnectionError, CoreError};
use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the `bridge` binary.
///
/// Library errors are flattened to their message so the exit path only has to
/// print one line, but the location of the conversion is kept.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Error from this app
    #[error("Bridge Error: {message} {location}")]
    Bridge {
        message: String,
        location: ErrorLocation,
    },

    /// Error from client-core operations (auth, connection)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Missing or invalid `bridge.toml`
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },
}

impl BridgeError {
    #[track_caller]
    pub fn bridge(message: impl Into<String>) -> Self {
        BridgeError::Bridge {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for BridgeError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Config(error) => error.into(),
            other => BridgeError::Core {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<AuthError> for BridgeError {
    #[track_caller]
    fn from(error: AuthError) -> Self {
        BridgeError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConnectionError> for BridgeError {
    #[track_caller]
    fn from(error: ConnectionError) -> Self {
        BridgeError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for BridgeError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        BridgeError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
