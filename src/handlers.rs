//! Subscriber registry.
//!
//! One slot per [`EventKind`]. Registering again replaces the previous
//! handler; there is no fan-out.

use crate::event::{ChatEvent, ChatMessage, ClearMessages, DeleteMessage, EventKind, PlatformEvent};

type Slot<T> = Option<Box<dyn FnMut(&T) + Send>>;

/// Handler slots for one connection. `R` is the platform's raw message type.
pub struct Handlers<R> {
    message: Slot<ChatMessage>,
    clear_messages: Slot<ClearMessages>,
    delete_message: Slot<DeleteMessage>,
    event: Slot<PlatformEvent>,
    raw_message: Slot<R>,
}

impl<R> Default for Handlers<R> {
    fn default() -> Self {
        Self {
            message: None,
            clear_messages: None,
            delete_message: None,
            event: None,
            raw_message: None,
        }
    }
}

impl<R> std::fmt::Debug for Handlers<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("message", &self.message.is_some())
            .field("clear_messages", &self.clear_messages.is_some())
            .field("delete_message", &self.delete_message.is_some())
            .field("event", &self.event.is_some())
            .field("raw_message", &self.raw_message.is_some())
            .finish()
    }
}

impl<R> Handlers<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(&mut self, f: impl FnMut(&ChatMessage) + Send + 'static) {
        self.message = Some(Box::new(f));
    }

    pub fn on_clear_messages(&mut self, f: impl FnMut(&ClearMessages) + Send + 'static) {
        self.clear_messages = Some(Box::new(f));
    }

    pub fn on_delete_message(&mut self, f: impl FnMut(&DeleteMessage) + Send + 'static) {
        self.delete_message = Some(Box::new(f));
    }

    pub fn on_event(&mut self, f: impl FnMut(&PlatformEvent) + Send + 'static) {
        self.event = Some(Box::new(f));
    }

    pub fn on_raw_message(&mut self, f: impl FnMut(&R) + Send + 'static) {
        self.raw_message = Some(Box::new(f));
    }

    /// Empty a slot.
    pub fn remove(&mut self, kind: EventKind) {
        match kind {
            EventKind::Message => self.message = None,
            EventKind::ClearMessages => self.clear_messages = None,
            EventKind::DeleteMessage => self.delete_message = None,
            EventKind::Event => self.event = None,
            EventKind::RawMessage => self.raw_message = None,
        }
    }

    /// Whether a slot holds a handler.
    pub fn is_registered(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Message => self.message.is_some(),
            EventKind::ClearMessages => self.clear_messages.is_some(),
            EventKind::DeleteMessage => self.delete_message.is_some(),
            EventKind::Event => self.event.is_some(),
            EventKind::RawMessage => self.raw_message.is_some(),
        }
    }

    /// Deliver a normalized event to its slot, if filled.
    pub fn dispatch(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::Message(m) => call(&mut self.message, m),
            ChatEvent::ClearMessages(c) => call(&mut self.clear_messages, c),
            ChatEvent::DeleteMessage(d) => call(&mut self.delete_message, d),
            ChatEvent::Event(e) => call(&mut self.event, e),
        }
    }

    /// Deliver a raw platform message, if the slot is filled.
    pub fn dispatch_raw(&mut self, raw: &R) {
        call(&mut self.raw_message, raw);
    }
}

fn call<T>(slot: &mut Slot<T>, value: &T) {
    if let Some(handler) = slot.as_mut() {
        handler(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Channel;
    use std::sync::{Arc, Mutex};

    fn clear() -> ChatEvent {
        ChatEvent::ClearMessages(ClearMessages {
            channel: Channel {
                room_id: "1".into(),
                name: "chan".into(),
            },
            user: None,
            timeout_duration_seconds: None,
            timestamp_sent: 0,
        })
    }

    #[test]
    fn test_register_replaces_previous() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut handlers: Handlers<String> = Handlers::new();

        let first = calls.clone();
        handlers.on_clear_messages(move |_| first.lock().unwrap().push("first"));
        let second = calls.clone();
        handlers.on_clear_messages(move |_| second.lock().unwrap().push("second"));

        handlers.dispatch(&clear());
        assert_eq!(*calls.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_unregistered_slot_is_noop() {
        let mut handlers: Handlers<String> = Handlers::new();
        handlers.dispatch(&clear());
        handlers.dispatch_raw(&"raw".to_string());
        assert!(!handlers.is_registered(EventKind::Message));
    }

    #[test]
    fn test_raw_and_remove() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handlers: Handlers<String> = Handlers::new();
        let sink = seen.clone();
        handlers.on_raw_message(move |raw| sink.lock().unwrap().push(raw.clone()));
        handlers.dispatch_raw(&"PING".to_string());
        assert!(handlers.is_registered(EventKind::RawMessage));

        handlers.remove(EventKind::RawMessage);
        handlers.dispatch_raw(&"PONG".to_string());
        assert_eq!(*seen.lock().unwrap(), vec!["PING".to_string()]);
    }
}
