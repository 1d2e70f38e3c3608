use crate::error::connection::ConnectionError;

use models::Message;

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

/// Identifies one registered handler so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

pub(crate) type MessageHandler = dyn Fn(&Message) + Send + Sync;
pub(crate) type LifecycleHandler = dyn Fn() + Send + Sync;
pub(crate) type ErrorHandler = dyn Fn(&ConnectionError) + Send + Sync;

struct Subscribers<H: ?Sized> {
    entries: RwLock<Vec<(HandlerId, Arc<H>)>>,
}

impl<H: ?Sized> Default for Subscribers<H> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<H: ?Sized> Subscribers<H> {
    fn add(&self, handler: Arc<H>) -> HandlerId {
        let id = HandlerId::new();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        id
    }

    fn remove(&self, id: HandlerId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    /// Handlers are cloned out so none run while the lock is held.
    fn snapshot(&self) -> Vec<Arc<H>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Per-class handler sets. A handler may register or remove others while an
/// event is being delivered; the change applies from the next event.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    message: Subscribers<MessageHandler>,
    connect: Subscribers<LifecycleHandler>,
    disconnect: Subscribers<LifecycleHandler>,
    error: Subscribers<ErrorHandler>,
}

impl HandlerRegistry {
    pub(crate) fn add_message(&self, handler: Arc<MessageHandler>) -> HandlerId {
        self.message.add(handler)
    }

    pub(crate) fn add_connect(&self, handler: Arc<LifecycleHandler>) -> HandlerId {
        self.connect.add(handler)
    }

    pub(crate) fn add_disconnect(&self, handler: Arc<LifecycleHandler>) -> HandlerId {
        self.disconnect.add(handler)
    }

    pub(crate) fn add_error(&self, handler: Arc<ErrorHandler>) -> HandlerId {
        self.error.add(handler)
    }

    /// Ids are unique across classes, so every class is searched.
    pub(crate) fn remove(&self, id: HandlerId) -> bool {
        self.message.remove(id)
            || self.connect.remove(id)
            || self.disconnect.remove(id)
            || self.error.remove(id)
    }

    pub(crate) fn emit_message(&self, message: &Message) {
        for handler in self.message.snapshot() {
            handler(message);
        }
    }

    pub(crate) fn emit_connect(&self) {
        for handler in self.connect.snapshot() {
            handler();
        }
    }

    pub(crate) fn emit_disconnect(&self) {
        for handler in self.disconnect.snapshot() {
            handler();
        }
    }

    pub(crate) fn emit_error(&self, error: &ConnectionError) {
        for handler in self.error.snapshot() {
            handler(error);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.message.len() + self.connect.len() + self.disconnect.len() + self.error.len()
    }
}
