use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Failures of the username/password exchange.
#[derive(Debug, ThisError)]
pub enum AuthError {
    /// The endpoint answered with a non-2xx status.
    #[error("Authentication Failed: {status} {message} {location}")]
    AuthenticationFailed {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl From<reqwest::Error> for AuthError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        AuthError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        AuthError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for AuthError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        AuthError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
