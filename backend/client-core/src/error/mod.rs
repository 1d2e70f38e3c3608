pub mod auth;
pub mod config;
pub mod connection;

pub use auth::AuthError;
pub use config::ConfigError;
pub use connection::ConnectionError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error(transparent)]
    Connection(#[from] connection::ConnectionError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
