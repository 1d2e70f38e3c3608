//! Resilient, role-specific websocket client.

mod canvas;
mod editor;
pub(crate) mod handlers;
pub(crate) mod machine;
pub(crate) mod policy;
pub(crate) mod queue;
mod role;
mod settings;
mod state;
pub(crate) mod transport;

pub use handlers::HandlerId;
pub use role::{Canvas, Editor, Role};
pub use settings::{ConnectionSettings, DEFAULT_REQUEST_TIMEOUT};
pub use state::ConnectionState;

use crate::auth::{self, SessionToken};
use crate::error::CoreError;
use crate::error::auth::AuthError;
use crate::error::connection::ConnectionError;
use transport::Shared;

use common::{ErrorLocation, RedactedSecret};
use models::{ClientRole, Message};

use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;
use std::sync::Arc;

use log::info;
use tokio::sync::watch;
use url::Url;

pub type EditorClient = Client<Editor>;
pub type CanvasClient = Client<Canvas>;

/// One websocket to the bridge server, authenticated with a session token.
///
/// Cloning is cheap and every clone drives the same socket. The socket is
/// reopened automatically after an unexpected close, with exponential backoff
/// (1s, 2s, 4s, 8s, 16s by default) for up to five attempts.
///
/// Async operations must run inside a Tokio runtime.
pub struct Client<R: Role> {
    shared: Arc<Shared>,
    role: PhantomData<fn() -> R>,
}

impl<R: Role> Clone for Client<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            role: PhantomData,
        }
    }
}

impl<R: Role> fmt::Debug for Client<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("role", &R::ROLE)
            .field("socket_url", &self.shared.socket_url.as_str())
            .field("state", &self.connection_state())
            .field("handlers", &self.shared.handlers.len())
            .finish()
    }
}

impl<R: Role> Client<R> {
    /// Client for `base_url` (`ws://` or `wss://`) with default settings.
    #[track_caller]
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        Self::with_settings(base_url, ConnectionSettings::default())
    }

    #[track_caller]
    pub fn with_settings(base_url: &str, settings: ConnectionSettings) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url).map_err(ConnectionError::from)?;
        if !matches!(base_url.scheme(), "ws" | "wss") {
            return Err(ConnectionError::UrlParse {
                message: format!(
                    "Base URL must use ws:// or wss://, got {}://",
                    base_url.scheme()
                ),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        }

        let socket_url = auth::join_path(&base_url, R::SOCKET_PATH);
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(AuthError::from)?;

        Ok(Self {
            shared: Arc::new(Shared::new(base_url, socket_url, http, &settings)),
            role: PhantomData,
        })
    }

    pub fn role(&self) -> ClientRole {
        R::ROLE
    }

    pub fn base_url(&self) -> &Url {
        &self.shared.base_url
    }

    pub fn socket_url(&self) -> &Url {
        &self.shared.socket_url
    }

    /// Exchange credentials for a session token and keep it for `connect()`.
    ///
    /// On failure any previously stored token is left untouched.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &RedactedSecret,
    ) -> Result<SessionToken, AuthError> {
        let grant = auth::exchange_credentials(
            &self.shared.http,
            &self.shared.base_url,
            username,
            password,
        )
        .await?;

        let token = SessionToken::from(grant);
        self.shared.lock_core().machine.set_token(token.clone());
        Ok(token)
    }

    /// Store a token obtained elsewhere, replacing any previous one.
    pub fn set_session_token(&self, token: impl Into<SessionToken>) {
        self.shared.lock_core().machine.set_token(token.into());
    }

    /// Open the role socket. Resolves once the socket is open and the auth
    /// frame plus any queued messages have been handed to it.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::NoSessionToken`] without a token; no socket is
    /// attempted. [`ConnectionError::Socket`] when the open fails, in which case
    /// error and disconnect handlers have fired and a reconnect is scheduled.
    pub async fn connect(&self) -> Result<(), ConnectionError> {
        self.shared.connect().await
    }

    pub async fn connect_with_token(
        &self,
        token: impl Into<SessionToken>,
    ) -> Result<(), ConnectionError> {
        self.set_session_token(token);
        self.connect().await
    }

    /// Write `message` now if connected, otherwise queue it for the next open.
    pub fn send(&self, message: impl Into<Message>) {
        self.shared.send(message.into());
    }

    /// Close the socket, forget the token and stop reconnecting.
    ///
    /// Queued messages stay queued. State turns `Disconnected` once the close
    /// completes.
    pub fn disconnect(&self) {
        info!("Disconnecting {} client", R::ROLE.as_str());
        self.shared.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.shared.lock_core().machine.state()
    }

    /// Watch channel that follows every state transition.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.subscribe_state()
    }

    pub fn queued_len(&self) -> usize {
        self.shared.lock_core().machine.queued_len()
    }

    pub fn has_session_token(&self) -> bool {
        self.shared.lock_core().machine.token().is_some()
    }

    /// Expiry of the stored token, when the server reported one.
    pub fn session_expires_at(&self) -> Option<u64> {
        self.shared
            .lock_core()
            .machine
            .token()
            .and_then(SessionToken::expires_at)
    }

    pub fn on_message(&self, handler: impl Fn(&Message) + Send + Sync + 'static) -> HandlerId {
        self.shared.handlers.add_message(Arc::new(handler))
    }

    pub fn on_connect(&self, handler: impl Fn() + Send + Sync + 'static) -> HandlerId {
        self.shared.handlers.add_connect(Arc::new(handler))
    }

    pub fn on_disconnect(&self, handler: impl Fn() + Send + Sync + 'static) -> HandlerId {
        self.shared.handlers.add_disconnect(Arc::new(handler))
    }

    pub fn on_error(
        &self,
        handler: impl Fn(&ConnectionError) + Send + Sync + 'static,
    ) -> HandlerId {
        self.shared.handlers.add_error(Arc::new(handler))
    }

    /// Returns `false` when `id` was not registered (or already removed).
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        self.shared.handlers.remove(id)
    }
}
