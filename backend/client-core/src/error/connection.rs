use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Everything that can go wrong between `connect()` and a closed socket.
///
/// Only [`NoSessionToken`](Self::NoSessionToken) and a failed initial open are
/// returned to callers; the rest reach error handlers.
#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("No Session Token Error: authenticate or supply a token before connecting {location}")]
    NoSessionToken { location: ErrorLocation },

    #[error("Socket Error: {message} {location}")]
    Socket {
        message: String,
        location: ErrorLocation,
    },

    #[error("Message Parse Error: {message} {location}")]
    MessageParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connection Exhausted Error: gave up after {attempts} reconnect attempts {location}")]
    ConnectionExhausted { attempts: u32, location: ErrorLocation },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for ConnectionError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ConnectionError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<models::ModelError> for ConnectionError {
    #[track_caller]
    fn from(error: models::ModelError) -> Self {
        ConnectionError::MessageParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
