//! Tokio side of the connection: owns the socket tasks and executes effects
//! produced by [`ConnectionMachine`].

use super::handlers::HandlerRegistry;
use super::machine::{ConnectionMachine, Effect, TransportEvent};
use super::settings::ConnectionSettings;
use super::state::ConnectionState;
use crate::error::connection::ConnectionError;

use common::ErrorLocation;
use models::Message;

use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, trace, warn};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Sending half of the live socket.
struct SocketWriter {
    generation: u64,
    frames: mpsc::UnboundedSender<WsMessage>,
}

impl SocketWriter {
    fn close(&self) {
        // The writer task exits after flushing this frame.
        let _ = self.frames.send(WsMessage::Close(None));
    }
}

/// Machine plus writer under one lock, so queue flushes and direct sends
/// reach the socket in submission order.
pub(crate) struct Core {
    pub(crate) machine: ConnectionMachine,
    writer: Option<SocketWriter>,
}

impl Core {
    /// Hand a message to the socket writer. Non-auth messages that cannot be
    /// written go back on the queue.
    fn transmit(&mut self, message: Message) {
        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Dropping {} message that failed to serialize: {e}", message.kind());
                return;
            }
        };

        let written = self
            .writer
            .as_ref()
            .is_some_and(|writer| writer.frames.send(WsMessage::Text(frame.into())).is_ok());

        if written {
            trace!("Sent {} message", message.kind());
        } else if !matches!(message, Message::Auth(_)) {
            warn!("Socket not writable; re-queueing {} message", message.kind());
            self.machine.requeue(message);
        }
    }

    /// Run transmits in place and return what must happen outside the lock.
    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut deferred = Vec::new();
        for effect in effects {
            match effect {
                Effect::Transmit(message) => self.transmit(message),
                other => deferred.push(other),
            }
        }
        deferred
    }
}

pub(crate) struct Shared {
    pub(crate) base_url: Url,
    pub(crate) socket_url: Url,
    pub(crate) http: reqwest::Client,
    pub(crate) handlers: HandlerRegistry,
    core: Mutex<Core>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    pub(crate) fn new(
        base_url: Url,
        socket_url: Url,
        http: reqwest::Client,
        settings: &ConnectionSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            base_url,
            socket_url,
            http,
            handlers: HandlerRegistry::default(),
            core: Mutex::new(Core {
                machine: ConnectionMachine::new(settings),
                writer: None,
            }),
            state_tx,
        }
    }

    /// Never held across an await.
    pub(crate) fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    fn publish_state(&self, state: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }

    pub(crate) fn send(&self, message: Message) {
        let mut core = self.lock_core();
        if let Some(message) = core.machine.submit(message) {
            core.transmit(message);
        }
    }

    /// Feed one socket event through the machine and act on the result.
    pub(crate) fn dispatch(self: &Arc<Self>, generation: u64, event: TransportEvent) {
        let deferred = {
            let mut core = self.lock_core();
            if event == TransportEvent::Closed
                && core
                    .writer
                    .as_ref()
                    .is_some_and(|writer| writer.generation == generation)
            {
                core.writer = None;
            }
            let effects = core.machine.handle(generation, event);
            let deferred = core.apply(effects);
            self.publish_state(core.machine.state());
            deferred
        };
        self.notify(deferred);
    }

    fn notify(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Deliver(message) => self.handlers.emit_message(&message),
                Effect::NotifyConnected => self.handlers.emit_connect(),
                Effect::NotifyDisconnected => self.handlers.emit_disconnect(),
                Effect::NotifyError(error) => self.handlers.emit_error(&error),
                Effect::ScheduleReconnect {
                    delay,
                    attempt,
                    generation,
                } => self.schedule_reconnect(delay, attempt, generation),
                Effect::Transmit(message) => self.send(message),
            }
        }
    }

    /// Open a fresh socket, replacing any existing one.
    pub(crate) async fn connect(self: &Arc<Self>) -> Result<(), ConnectionError> {
        let generation = {
            let mut core = self.lock_core();
            let generation = core.machine.begin_connect()?;
            if let Some(previous) = core.writer.take() {
                debug!("Replacing socket #{}", previous.generation);
                previous.close();
            }
            self.publish_state(core.machine.state());
            generation
        };
        self.open(generation).await
    }

    pub(crate) fn disconnect(&self) {
        let mut core = self.lock_core();
        core.machine.disconnect();
        if let Some(writer) = core.writer.take() {
            info!("Closing socket #{}", writer.generation);
            writer.close();
        }
        self.publish_state(core.machine.state());
    }

    async fn open(self: &Arc<Self>, generation: u64) -> Result<(), ConnectionError> {
        info!("Opening {} (socket #{generation})", self.socket_url);

        let stream = match connect_async(self.socket_url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                let message = format!("Failed to open {}: {e}", self.socket_url);
                self.dispatch(generation, TransportEvent::Failed(message.clone()));
                self.dispatch(generation, TransportEvent::Closed);
                return Err(ConnectionError::Socket {
                    message,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let (sink, stream) = stream.split();
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        {
            let mut core = self.lock_core();
            if core.machine.generation() != generation {
                debug!("Socket #{generation} was superseded before it opened");
                return Err(ConnectionError::Socket {
                    message: format!("Socket #{generation} was superseded before it opened"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            core.writer = Some(SocketWriter {
                generation,
                frames: frames_tx,
            });
        }

        tokio::spawn(write_frames(sink, frames_rx, generation));
        self.dispatch(generation, TransportEvent::Opened);
        tokio::spawn(read_frames(Arc::clone(self), stream, generation));
        Ok(())
    }

    fn schedule_reconnect(self: &Arc<Self>, delay: Duration, attempt: u32, generation: u64) {
        info!(
            "Reconnecting in {}ms (attempt {attempt})",
            delay.as_millis()
        );
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.retry(generation).await;
        });
    }

    async fn retry(self: Arc<Self>, generation: u64) {
        let next = {
            let mut core = self.lock_core();
            if !core.machine.may_reconnect(generation) {
                debug!("Reconnect scheduled by socket #{generation} is no longer wanted");
                return;
            }
            match core.machine.begin_connect() {
                Ok(next) => {
                    self.publish_state(core.machine.state());
                    next
                }
                Err(e) => {
                    warn!("Reconnect skipped: {e}");
                    return;
                }
            }
        };

        if let Err(e) = self.open(next).await {
            debug!("Reconnect attempt for socket #{next} failed: {e}");
        }
    }
}

async fn write_frames(
    mut sink: SplitSink<WsStream, WsMessage>,
    mut frames: mpsc::UnboundedReceiver<WsMessage>,
    generation: u64,
) {
    while let Some(frame) = frames.recv().await {
        let closing = matches!(frame, WsMessage::Close(_));
        if let Err(e) = sink.send(frame).await {
            warn!("Socket #{generation} write failed: {e}");
            break;
        }
        if closing {
            break;
        }
    }
    trace!("Socket #{generation} writer stopped");
}

async fn read_frames(shared: Arc<Shared>, mut stream: SplitStream<WsStream>, generation: u64) {
    while let Some(next) = stream.next().await {
        match next {
            Ok(WsMessage::Text(text)) => {
                shared.dispatch(generation, TransportEvent::Frame(text.as_str().to_owned()));
            }
            Ok(WsMessage::Binary(bytes)) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                shared.dispatch(generation, TransportEvent::Frame(text));
            }
            Ok(WsMessage::Close(frame)) => {
                debug!("Socket #{generation} closed by peer: {frame:?}");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                shared.dispatch(
                    generation,
                    TransportEvent::Failed(format!("Socket #{generation} read failed: {e}")),
                );
                break;
            }
        }
    }
    shared.dispatch(generation, TransportEvent::Closed);
}
