pub mod config;
pub mod file;
pub mod listen;
pub mod login;
pub mod watch;

use crate::cli::Credentials;
use crate::error::BridgeError;

use client_core::connection::Role;
use client_core::{Client, ClientConfig, ConnectionSettings};

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};

/// Resolved configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config_dir: PathBuf,
    pub config: ClientConfig,
}

impl Context {
    /// Load `bridge.toml` from `config_dir` (or the per-user default) and apply
    /// a base address override.
    pub fn load(
        config_dir: Option<PathBuf>,
        base_url: Option<String>,
    ) -> Result<Self, BridgeError> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => ClientConfig::default_dir()?,
        };

        let mut config = ClientConfig::load(&config_dir)?;
        if let Some(base_url) = base_url {
            debug!("Base URL overridden to {base_url}");
            config.server.base_url = base_url;
            config.validate()?;
        }

        Ok(Self { config_dir, config })
    }

    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings::from(&self.config)
    }

    pub fn client<R: Role>(&self) -> Result<Client<R>, BridgeError> {
        Ok(Client::with_settings(
            &self.config.server.base_url,
            self.settings(),
        )?)
    }
}

/// Give `client` a session token (existing one first, else a login) and connect.
pub async fn establish<R: Role>(
    client: &Client<R>,
    credentials: &Credentials,
) -> Result<(), BridgeError> {
    match credentials {
        Credentials {
            session_token: Some(token),
            ..
        } => {
            debug!("Using supplied session token");
            client.set_session_token(token.expose());
        }
        Credentials {
            username: Some(username),
            password: Some(password),
            ..
        } => {
            client.authenticate(username, password).await?;
        }
        _ => {
            return Err(BridgeError::bridge(
                "Provide --session-token, or --username and --password",
            ));
        }
    }

    client.connect().await?;
    Ok(())
}

/// Log lifecycle events for an interactive session.
pub fn log_lifecycle<R: Role>(client: &Client<R>) {
    let role = client.role().as_str();
    client.on_connect(move || info!("Connected as {role}"));
    client.on_disconnect(move || warn!("Disconnected ({role})"));
    client.on_error(|e| error!("{e}"));
}

/// Print each inbound message to stdout as a single JSON line.
pub fn print_messages<R: Role>(client: &Client<R>) {
    client.on_message(|message| match message.to_frame() {
        Ok(frame) => println!("{frame}"),
        Err(e) => warn!("Could not render {} message: {e}", message.kind()),
    });
}

/// Resolve on Ctrl-C, or after `limit` when given.
pub async fn wait_for_shutdown(limit: Option<Duration>) -> Result<(), BridgeError> {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| BridgeError::bridge(format!("Failed to listen for Ctrl-C: {e}")))
    };

    match limit {
        Some(limit) => {
            tokio::select! {
                result = ctrl_c => result,
                () = tokio::time::sleep(limit) => Ok(()),
            }
        }
        None => ctrl_c.await,
    }
}
