use crate::connection::handlers::HandlerRegistry;
use crate::error::connection::ConnectionError;

use common::ErrorLocation;
use models::{FileOperation, Message};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// **VALUE**: Every subscriber sees every event.
///
/// **BUG THIS CATCHES**: A registry that stores a single callback per class, so a second
/// `on_message` silently replaces the first.
#[test]
fn given_two_message_handlers_when_message_emitted_then_both_invoked() {
    // GIVEN: Two independent message handlers
    let registry = HandlerRegistry::default();
    let first = counter();
    let second = counter();
    let (a, b) = (Arc::clone(&first), Arc::clone(&second));
    registry.add_message(Arc::new(move |_: &Message| {
        a.fetch_add(1, Ordering::SeqCst);
    }));
    registry.add_message(Arc::new(move |_: &Message| {
        b.fetch_add(1, Ordering::SeqCst);
    }));

    // WHEN: Emitting one message
    registry.emit_message(&Message::from(FileOperation::list(None)));

    // THEN: Both ran once
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

/// **VALUE**: Removing a handler only removes that handler.
#[test]
fn given_removed_handler_when_event_emitted_then_only_remaining_handler_runs() {
    // GIVEN: Two connect handlers, one of which is removed
    let registry = HandlerRegistry::default();
    let kept = counter();
    let removed = counter();
    let (k, r) = (Arc::clone(&kept), Arc::clone(&removed));
    registry.add_connect(Arc::new(move || {
        k.fetch_add(1, Ordering::SeqCst);
    }));
    let id = registry.add_connect(Arc::new(move || {
        r.fetch_add(1, Ordering::SeqCst);
    }));
    assert!(registry.remove(id));

    // WHEN: Emitting connect
    registry.emit_connect();

    // THEN: Only the kept handler ran, and a second removal reports nothing removed
    assert_eq!(kept.load(Ordering::SeqCst), 1);
    assert_eq!(removed.load(Ordering::SeqCst), 0);
    assert!(!registry.remove(id));
    assert_eq!(registry.len(), 1);
}

#[test]
fn given_handlers_in_other_classes_when_error_emitted_then_only_error_handlers_run() {
    // GIVEN: One disconnect handler and one error handler
    let registry = HandlerRegistry::default();
    let disconnects = counter();
    let errors = counter();
    let (d, e) = (Arc::clone(&disconnects), Arc::clone(&errors));
    registry.add_disconnect(Arc::new(move || {
        d.fetch_add(1, Ordering::SeqCst);
    }));
    registry.add_error(Arc::new(move |_: &ConnectionError| {
        e.fetch_add(1, Ordering::SeqCst);
    }));

    // WHEN: Emitting an error
    registry.emit_error(&ConnectionError::Socket {
        message: "boom".to_string(),
        location: ErrorLocation::caller(),
    });

    // THEN: Only the error handler ran
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
}

/// **BUG THIS CATCHES**: Deadlock when a handler unsubscribes itself during delivery.
#[test]
fn given_handler_that_removes_itself_when_emitted_twice_then_runs_once() {
    // GIVEN: A handler that removes its own registration when called
    let registry = Arc::new(HandlerRegistry::default());
    let calls = counter();
    let slot = Arc::new(std::sync::Mutex::new(None));
    let (reg, c, s) = (Arc::clone(&registry), Arc::clone(&calls), Arc::clone(&slot));
    let id = registry.add_disconnect(Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = *s.lock().unwrap() {
            reg.remove(id);
        }
    }));
    *slot.lock().unwrap() = Some(id);

    // WHEN: Emitting twice
    registry.emit_disconnect();
    registry.emit_disconnect();

    // THEN: Second emission found no handler
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
