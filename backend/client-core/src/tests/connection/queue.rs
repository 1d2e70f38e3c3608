use crate::connection::queue::OutboundQueue;

use models::{FileOperation, Message};

fn read(path: &str) -> Message {
    Message::from(FileOperation::read(path))
}

/// **VALUE**: Offline messages come out in the order they went in.
///
/// **BUG THIS CATCHES**: A stack instead of a queue, which would replay a delete before
/// the create that preceded it.
#[test]
fn given_queued_messages_when_drained_then_yields_fifo_and_empties() {
    // GIVEN: Three messages queued in order
    let mut queue = OutboundQueue::new(None);
    queue.push(read("a"));
    queue.push(read("b"));
    queue.push(read("c"));

    // WHEN: Draining
    let drained: Vec<_> = queue.drain().collect();

    // THEN: Same order, queue empty
    assert_eq!(drained, vec![read("a"), read("b"), read("c")]);
    assert!(queue.is_empty());
}

/// **VALUE**: A bounded queue keeps the newest messages.
///
/// **WHY THIS MATTERS**: A client left offline for hours must not grow without limit,
/// and the most recent state is the one worth replaying.
#[test]
fn given_full_bounded_queue_when_pushed_then_evicts_oldest() {
    // GIVEN: A queue with capacity two, already full
    let mut queue = OutboundQueue::new(Some(2));
    queue.push(read("a"));
    queue.push(read("b"));

    // WHEN: Pushing a third message
    queue.push(read("c"));

    // THEN: The oldest one is gone
    assert_eq!(queue.len(), 2);
    let drained: Vec<_> = queue.drain().collect();
    assert_eq!(drained, vec![read("b"), read("c")]);
}

#[test]
fn given_unbounded_queue_when_many_pushed_then_keeps_all() {
    let mut queue = OutboundQueue::new(None);

    for i in 0..1000 {
        queue.push(read(&i.to_string()));
    }

    assert_eq!(queue.len(), 1000);
}
