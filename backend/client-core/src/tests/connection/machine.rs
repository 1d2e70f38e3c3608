use crate::auth::SessionToken;
use crate::connection::ConnectionSettings;
use crate::connection::ConnectionState;
use crate::connection::machine::{ConnectionMachine, Effect, TransportEvent};
use crate::error::connection::ConnectionError;

use models::{FileOperation, Message};

use std::time::Duration;

fn machine_with_token() -> ConnectionMachine {
    let mut machine = ConnectionMachine::new(&ConnectionSettings::default());
    machine.set_token(SessionToken::new("tok-1"));
    machine
}

fn read(path: &str) -> Message {
    Message::from(FileOperation::read(path))
}

/// Drive one socket until it is open and return its generation.
fn open(machine: &mut ConnectionMachine) -> u64 {
    let generation = machine.begin_connect().unwrap();
    machine.handle(generation, TransportEvent::Opened);
    generation
}

fn reconnect_delay(effects: &[Effect]) -> Option<Duration> {
    effects.iter().find_map(|effect| match effect {
        Effect::ScheduleReconnect { delay, .. } => Some(*delay),
        _ => None,
    })
}

fn transmitted(effects: &[Effect]) -> Vec<Message> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Transmit(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// **VALUE**: Connecting without a token fails before any socket is attempted.
///
/// **BUG THIS CATCHES**: Opening a socket that the server will immediately reject, and
/// burning reconnect attempts on it.
#[test]
fn given_no_token_when_begin_connect_then_returns_no_session_token_and_stays_disconnected() {
    // GIVEN: A machine that never received a token
    let mut machine = ConnectionMachine::new(&ConnectionSettings::default());

    // WHEN: Starting a connection
    let result = machine.begin_connect();

    // THEN: NoSessionToken and no new socket generation
    assert!(matches!(result, Err(ConnectionError::NoSessionToken { .. })));
    assert_eq!(machine.state(), ConnectionState::Disconnected);
    assert_eq!(machine.generation(), 0);
}

/// **VALUE**: The open sequence is auth, then the queue in order, then connect handlers.
///
/// **WHY THIS MATTERS**: The server drops any frame that arrives before `auth`, and
/// handlers that send on connect must not overtake messages queued earlier.
///
/// **BUG THIS CATCHES**: Notifying handlers before flushing, or flushing before auth.
#[test]
fn given_queued_messages_when_opened_then_auth_then_queue_then_notify() {
    // GIVEN: Two messages submitted while disconnected
    let mut machine = machine_with_token();
    assert!(machine.submit(read("a")).is_none());
    assert!(machine.submit(read("b")).is_none());
    let generation = machine.begin_connect().unwrap();

    // WHEN: The socket opens
    let effects = machine.handle(generation, TransportEvent::Opened);

    // THEN: auth, a, b are transmitted in that order, followed by the connect notification
    assert_eq!(
        transmitted(&effects),
        vec![Message::auth("tok-1"), read("a"), read("b")]
    );
    assert!(matches!(effects.last(), Some(Effect::NotifyConnected)));
    assert_eq!(machine.state(), ConnectionState::Connected);
    assert_eq!(machine.queued_len(), 0);
}

#[test]
fn given_connected_when_submit_then_message_passes_through() {
    // GIVEN: An open connection
    let mut machine = machine_with_token();
    open(&mut machine);

    // WHEN: Submitting a message
    let passed = machine.submit(read("a"));

    // THEN: It is returned for immediate transmission, not queued
    assert_eq!(passed, Some(read("a")));
    assert_eq!(machine.queued_len(), 0);
}

/// **BUG THIS CATCHES**: Sending application frames mid-handshake, before `auth`.
#[test]
fn given_connecting_when_submit_then_message_is_queued() {
    // GIVEN: A socket that is still opening
    let mut machine = machine_with_token();
    machine.begin_connect().unwrap();

    // WHEN: Submitting
    let passed = machine.submit(read("a"));

    // THEN: Queued
    assert!(passed.is_none());
    assert_eq!(machine.queued_len(), 1);
}

/// **VALUE**: Malformed frames are reported but never tear down the connection.
#[test]
fn given_malformed_frame_when_handled_then_reports_parse_error_and_keeps_state() {
    // GIVEN: An open connection
    let mut machine = machine_with_token();
    let generation = open(&mut machine);

    // WHEN: A non-JSON frame arrives
    let effects = machine.handle(generation, TransportEvent::Frame("{not json".to_string()));

    // THEN: One parse error, still connected
    assert!(matches!(
        effects.as_slice(),
        [Effect::NotifyError(ConnectionError::MessageParse { .. })]
    ));
    assert_eq!(machine.state(), ConnectionState::Connected);
}

/// **VALUE**: Well-formed frames this client has no type for still reach message
/// handlers.
///
/// **BUG THIS CATCHES**: Treating an unknown `type`, an unknown role key or an
/// unexpected status value as a parse error, hiding the frame from every handler.
#[test]
fn given_well_formed_unrecognised_frames_when_handled_then_delivered() {
    // GIVEN: An open connection
    let mut machine = machine_with_token();
    let generation = open(&mut machine);
    let frames = [
        (r#"{"type":"fileOperationResult","path":"a.ts","ok":true}"#, "fileOperationResult"),
        (r#"{"type":"connectedClients","counts":{"vsc":1,"web":2}}"#, "connectedClients"),
        (
            r#"{"type":"codeGenResponse","componentId":"c","code":"","specFile":"c.yaml","status":"IN_PROGRESS"}"#,
            "codeGenResponse",
        ),
    ];

    for (frame, kind) in frames {
        // WHEN: The frame arrives
        let effects = machine.handle(generation, TransportEvent::Frame(frame.to_string()));

        // THEN: Delivered under its own type, no error
        match effects.as_slice() {
            [Effect::Deliver(message)] => assert_eq!(message.kind(), kind),
            other => panic!("frame {frame} produced {other:?}"),
        }
    }
    assert_eq!(machine.state(), ConnectionState::Connected);
}

#[test]
fn given_valid_frame_when_handled_then_delivers_message() {
    // GIVEN: An open connection
    let mut machine = machine_with_token();
    let generation = open(&mut machine);

    // WHEN: A status update arrives
    let effects = machine.handle(
        generation,
        TransportEvent::Frame(
            r#"{"type":"statusUpdate","componentId":"c1","status":"READY"}"#.to_string(),
        ),
    );

    // THEN: It is delivered as a typed message
    assert!(matches!(
        effects.as_slice(),
        [Effect::Deliver(Message::StatusUpdate(update))] if update.component_id == "c1"
    ));
}

#[test]
fn given_transport_failure_when_handled_then_enters_error_and_reports_socket_error() {
    let mut machine = machine_with_token();
    let generation = open(&mut machine);

    let effects = machine.handle(generation, TransportEvent::Failed("reset".to_string()));

    assert_eq!(machine.state(), ConnectionState::Error);
    assert!(matches!(
        effects.as_slice(),
        [Effect::NotifyError(ConnectionError::Socket { message, .. })] if message == "reset"
    ));
}

/// **VALUE**: Consecutive failures back off 1s, 2s, 4s, 8s, 16s, then report exhaustion.
///
/// **WHY THIS MATTERS**: This is the externally observable retry schedule.
///
/// **BUG THIS CATCHES**: An extra retry, a missing exhaustion signal, or retries that
/// continue forever.
#[test]
fn given_repeated_closes_when_handled_then_schedule_doubles_and_exhausts_after_five() {
    // GIVEN: A connection that opened once and then keeps failing to reopen
    let mut machine = machine_with_token();
    let mut generation = open(&mut machine);
    let mut delays = Vec::new();

    // WHEN: Each retry closes again immediately
    let exhausted = loop {
        let effects = machine.handle(generation, TransportEvent::Closed);
        assert!(matches!(effects.first(), Some(Effect::NotifyDisconnected)));
        match reconnect_delay(&effects) {
            Some(delay) => {
                delays.push(delay.as_millis());
                assert!(machine.may_reconnect(generation));
                generation = machine.begin_connect().unwrap();
            }
            None => break effects,
        }
    };

    // THEN: Five delays, then ConnectionExhausted
    assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
    assert!(exhausted.iter().any(|effect| matches!(
        effect,
        Effect::NotifyError(ConnectionError::ConnectionExhausted { attempts: 5, .. })
    )));
    assert_eq!(machine.state(), ConnectionState::Disconnected);
}

/// **VALUE**: A successful reopen restarts the schedule.
///
/// **BUG THIS CATCHES**: Counting attempts across unrelated outages until a long-lived
/// client can no longer reconnect at all.
#[test]
fn given_successful_reopen_when_closed_again_then_delay_restarts_at_one_second() {
    // GIVEN: Two failed attempts followed by a successful reopen
    let mut machine = machine_with_token();
    let mut generation = open(&mut machine);
    for _ in 0..2 {
        machine.handle(generation, TransportEvent::Closed);
        generation = machine.begin_connect().unwrap();
    }
    machine.handle(generation, TransportEvent::Opened);
    assert_eq!(machine.policy().attempts(), 0);

    // WHEN: The connection drops again
    let effects = machine.handle(generation, TransportEvent::Closed);

    // THEN: Back to the first delay
    assert_eq!(reconnect_delay(&effects), Some(Duration::from_millis(1000)));
}

/// **VALUE**: After `disconnect()` nothing reopens the socket.
///
/// **BUG THIS CATCHES**: A retry timer that was armed before the disconnect firing
/// afterwards and silently reconnecting.
#[test]
fn given_pending_retry_when_disconnected_then_retry_is_refused() {
    // GIVEN: A close that scheduled a retry
    let mut machine = machine_with_token();
    let generation = open(&mut machine);
    let effects = machine.handle(generation, TransportEvent::Closed);
    assert!(reconnect_delay(&effects).is_some());

    // WHEN: The caller disconnects before the retry fires
    machine.disconnect();

    // THEN: The retry may not proceed and connecting needs new credentials
    assert!(!machine.may_reconnect(generation));
    assert!(machine.token().is_none());
    assert!(matches!(
        machine.begin_connect(),
        Err(ConnectionError::NoSessionToken { .. })
    ));
}

#[test]
fn given_user_disconnect_when_socket_closes_then_no_retry_and_no_exhaustion() {
    // GIVEN: An open connection the caller disconnects
    let mut machine = machine_with_token();
    let generation = open(&mut machine);
    machine.disconnect();

    // WHEN: The close arrives
    let effects = machine.handle(generation, TransportEvent::Closed);

    // THEN: Only the disconnect notification
    assert!(matches!(effects.as_slice(), [Effect::NotifyDisconnected]));
    assert_eq!(machine.state(), ConnectionState::Disconnected);
}

/// **BUG THIS CATCHES**: A replaced socket's late close event scheduling a reconnect
/// for the healthy socket that replaced it.
#[test]
fn given_superseded_socket_when_its_events_arrive_then_ignored() {
    // GIVEN: A second connect that replaced the first socket
    let mut machine = machine_with_token();
    let first = open(&mut machine);
    let second = open(&mut machine);
    assert_ne!(first, second);

    // WHEN: The first socket reports a close
    let effects = machine.handle(first, TransportEvent::Closed);

    // THEN: Nothing happens
    assert!(effects.is_empty());
    assert_eq!(machine.state(), ConnectionState::Connected);
}

#[test]
fn given_connecting_when_disconnected_then_in_flight_open_is_abandoned() {
    // GIVEN: A socket still opening
    let mut machine = machine_with_token();
    let generation = machine.begin_connect().unwrap();

    // WHEN: Disconnecting
    machine.disconnect();

    // THEN: State returns to disconnected and the late open is ignored
    assert_eq!(machine.state(), ConnectionState::Disconnected);
    assert!(machine.handle(generation, TransportEvent::Opened).is_empty());
    assert_eq!(machine.state(), ConnectionState::Disconnected);
}

#[test]
fn given_messages_queued_when_disconnect_called_then_queue_is_kept() {
    let mut machine = machine_with_token();
    machine.submit(read("a"));

    machine.disconnect();

    assert_eq!(machine.queued_len(), 1);
}
