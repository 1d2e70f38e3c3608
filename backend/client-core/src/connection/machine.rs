//! Connection state machine, free of any I/O.
//!
//! The transport feeds socket events in and executes the returned effects in
//! order. Every socket carries a generation number; events from a socket that
//! has since been replaced are ignored.

use super::policy::ReconnectPolicy;
use super::queue::OutboundQueue;
use super::settings::ConnectionSettings;
use super::state::ConnectionState;
use crate::auth::SessionToken;
use crate::error::connection::ConnectionError;

use common::ErrorLocation;
use models::Message;

use std::panic::Location;
use std::time::Duration;

use log::{debug, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportEvent {
    Opened,
    Frame(String),
    Failed(String),
    Closed,
}

#[derive(Debug)]
pub(crate) enum Effect {
    Transmit(Message),
    Deliver(Message),
    NotifyConnected,
    NotifyDisconnected,
    NotifyError(ConnectionError),
    ScheduleReconnect {
        delay: Duration,
        attempt: u32,
        generation: u64,
    },
}

#[derive(Debug)]
pub(crate) struct ConnectionMachine {
    state: ConnectionState,
    token: Option<SessionToken>,
    queue: OutboundQueue,
    policy: ReconnectPolicy,
    generation: u64,
    user_disconnected: bool,
}

impl ConnectionMachine {
    pub(crate) fn new(settings: &ConnectionSettings) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            token: None,
            queue: OutboundQueue::new(settings.queue_capacity),
            policy: ReconnectPolicy::new(
                settings.max_reconnect_attempts,
                settings.initial_reconnect_delay,
                settings.max_reconnect_delay,
            ),
            generation: 0,
            user_disconnected: false,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub(crate) fn set_token(&mut self, token: SessionToken) {
        self.token = Some(token);
    }

    pub(crate) fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Start a new socket. Returns the generation it must report events under.
    #[track_caller]
    pub(crate) fn begin_connect(&mut self) -> Result<u64, ConnectionError> {
        if self.token.is_none() {
            return Err(ConnectionError::NoSessionToken {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.user_disconnected = false;
        self.generation += 1;
        self.state = ConnectionState::Connecting;
        Ok(self.generation)
    }

    /// Whether a retry scheduled by socket `generation` may still open a socket.
    pub(crate) fn may_reconnect(&self, generation: u64) -> bool {
        !self.user_disconnected
            && self.policy.is_enabled()
            && self.token.is_some()
            && self.generation == generation
            && !matches!(
                self.state,
                ConnectionState::Connecting | ConnectionState::Connected
            )
    }

    /// `Some(message)` when it should go straight out, `None` when it was queued.
    pub(crate) fn submit(&mut self, message: Message) -> Option<Message> {
        if self.state == ConnectionState::Connected {
            Some(message)
        } else {
            trace!("Queueing {} message while {}", message.kind(), self.state);
            self.queue.push(message);
            None
        }
    }

    /// Put back a message the transport could not hand to the socket.
    pub(crate) fn requeue(&mut self, message: Message) {
        self.queue.push(message);
    }

    /// Caller-initiated shutdown: clear the token and stop all reconnection.
    pub(crate) fn disconnect(&mut self) {
        self.user_disconnected = true;
        self.token = None;
        self.policy.disable();
        if self.state == ConnectionState::Connecting {
            // Abandon the in-flight open.
            self.generation += 1;
            self.state = ConnectionState::Disconnected;
        }
    }

    pub(crate) fn handle(&mut self, generation: u64, event: TransportEvent) -> Vec<Effect> {
        if generation != self.generation {
            trace!(
                "Ignoring {event:?} from superseded socket #{generation} (current #{})",
                self.generation
            );
            return Vec::new();
        }

        match event {
            TransportEvent::Opened => self.on_opened(),
            TransportEvent::Frame(frame) => self.on_frame(&frame),
            TransportEvent::Failed(reason) => self.on_failed(reason),
            TransportEvent::Closed => self.on_closed(),
        }
    }

    fn on_opened(&mut self) -> Vec<Effect> {
        self.state = ConnectionState::Connected;
        self.policy.reset();

        let mut effects = Vec::with_capacity(self.queue.len() + 2);
        match &self.token {
            Some(token) => effects.push(Effect::Transmit(Message::auth(token.expose()))),
            None => warn!("Socket #{} opened without a session token", self.generation),
        }

        if !self.queue.is_empty() {
            debug!("Flushing {} queued messages", self.queue.len());
        }
        effects.extend(self.queue.drain().map(Effect::Transmit));
        effects.push(Effect::NotifyConnected);

        info!("Socket #{} connected", self.generation);
        effects
    }

    fn on_frame(&mut self, frame: &str) -> Vec<Effect> {
        match Message::from_frame(frame) {
            Ok(message) => vec![Effect::Deliver(message)],
            Err(e) => {
                warn!("Discarding unparseable frame: {e}");
                vec![Effect::NotifyError(ConnectionError::MessageParse {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })]
            }
        }
    }

    fn on_failed(&mut self, reason: String) -> Vec<Effect> {
        warn!("Socket #{} failed: {reason}", self.generation);
        self.state = ConnectionState::Error;
        vec![Effect::NotifyError(ConnectionError::Socket {
            message: reason,
            location: ErrorLocation::from(Location::caller()),
        })]
    }

    fn on_closed(&mut self) -> Vec<Effect> {
        self.state = ConnectionState::Disconnected;
        info!("Socket #{} closed", self.generation);

        let mut effects = vec![Effect::NotifyDisconnected];
        if self.user_disconnected {
            return effects;
        }

        match self.policy.next_delay() {
            Some(delay) => effects.push(Effect::ScheduleReconnect {
                delay,
                attempt: self.policy.attempts(),
                generation: self.generation,
            }),
            None if self.policy.is_enabled() => {
                warn!(
                    "Giving up after {} reconnect attempts",
                    self.policy.max_attempts()
                );
                effects.push(Effect::NotifyError(ConnectionError::ConnectionExhausted {
                    attempts: self.policy.max_attempts(),
                    location: ErrorLocation::from(Location::caller()),
                }));
            }
            None => {}
        }
        effects
    }
}
