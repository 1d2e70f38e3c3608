use models::Message;

use std::collections::VecDeque;

use log::warn;

/// FIFO of messages submitted while the socket was not writable.
#[derive(Debug, Default)]
pub(crate) struct OutboundQueue {
    messages: VecDeque<Message>,
    capacity: Option<usize>,
}

impl OutboundQueue {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            messages: VecDeque::new(),
            capacity,
        }
    }

    /// Enqueue at the back. A bounded queue evicts its oldest entry when full.
    pub(crate) fn push(&mut self, message: Message) {
        if let Some(capacity) = self.capacity
            && self.messages.len() >= capacity
            && let Some(evicted) = self.messages.pop_front()
        {
            warn!(
                "Outbound queue full ({capacity}); dropping oldest {} message",
                evicted.kind()
            );
        }
        self.messages.push_back(message);
    }

    /// Take everything in submission order, leaving the queue empty.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Message> + '_ {
        self.messages.drain(..)
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
