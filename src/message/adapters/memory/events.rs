//! In-memory event log implementing the `EventSink` and `LazyLoader` ports.
//!
//! Original content is rebuilt by folding the raw content carried by
//! `ReplyPosted` and `MessageRevised` events, so the loader always returns
//! what was last submitted for a message, before filtering.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::message::{
    domain::{EventEnvelope, MessageContent, MessageEvent, MessageId},
    error::CollaboratorError,
    ports::{
        events::{EventSink, EventSinkResult},
        loader::{LazyLoader, LoaderResult},
    },
};

#[derive(Debug, Default)]
struct EventLog {
    envelopes: Vec<EventEnvelope>,
    originals: HashMap<MessageId, MessageContent>,
    unavailable: bool,
}

impl EventLog {
    fn fold(&mut self, event: &MessageEvent) {
        match event {
            MessageEvent::ReplyPosted {
                reply_id, content, ..
            } => {
                self.originals.insert(*reply_id, content.clone());
            }
            MessageEvent::MessageRevised {
                message_id,
                content,
                ..
            } => {
                self.originals.insert(*message_id, content.clone());
            }
            MessageEvent::MessagePropertiesRevised { .. }
            | MessageEvent::UploadFilesAttached { .. } => {}
        }
    }
}

/// In-memory event store.
///
/// Thread-safe via internal [`RwLock`]. Clones share the same log.
///
/// # Example
///
/// ```
/// use agora::message::adapters::memory::InMemoryEventStore;
/// use agora::message::domain::{MessageContent, MessageId};
/// use agora::message::ports::loader::LazyLoader;
///
/// let store = InMemoryEventStore::new();
/// store.record_original(MessageId::new(1), MessageContent::new("Hello", "World"));
/// let original = store.reload(MessageId::new(1)).expect("seeded");
/// assert_eq!(original.body(), "World");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    log: Arc<RwLock<EventLog>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the original content of a message created outside the log.
    pub fn record_original(&self, id: MessageId, content: MessageContent) {
        if let Ok(mut log) = self.log.write() {
            log.originals.insert(id, content);
        }
    }

    /// Makes subsequent publishes fail (`false`) or succeed (`true`).
    pub fn set_available(&self, available: bool) {
        if let Ok(mut log) = self.log.write() {
            log.unavailable = !available;
        }
    }

    /// Returns every envelope published so far, in order.
    #[must_use]
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.log
            .read()
            .map(|log| log.envelopes.clone())
            .unwrap_or_default()
    }

    /// Returns every event published so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<MessageEvent> {
        self.envelopes()
            .into_iter()
            .map(EventEnvelope::into_event)
            .collect()
    }

    /// Returns the events whose aggregate is `id`.
    #[must_use]
    pub fn events_for(&self, id: MessageId) -> Vec<MessageEvent> {
        self.envelopes()
            .into_iter()
            .filter(|envelope| envelope.aggregate_id() == id)
            .map(EventEnvelope::into_event)
            .collect()
    }

    /// Returns the number of published events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.read().map(|log| log.envelopes.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for InMemoryEventStore {
    fn publish(&self, batch: &[EventEnvelope]) -> EventSinkResult<()> {
        let mut log = self
            .log
            .write()
            .map_err(|e| CollaboratorError::event_sink(std::io::Error::other(e.to_string())))?;

        if log.unavailable {
            warn!(events = batch.len(), "event store unavailable, rejecting batch");
            return Err(CollaboratorError::event_sink(std::io::Error::other(
                "event store unavailable",
            )));
        }

        for envelope in batch {
            log.fold(envelope.event());
            debug!(
                event_id = %envelope.event_id(),
                message_id = %envelope.aggregate_id(),
                event_type = envelope.event().event_type(),
                "event published"
            );
        }
        log.envelopes.extend_from_slice(batch);
        Ok(())
    }
}

impl LazyLoader for InMemoryEventStore {
    fn reload(&self, id: MessageId) -> LoaderResult<MessageContent> {
        let log = self
            .log
            .read()
            .map_err(|e| CollaboratorError::loader(std::io::Error::other(e.to_string())))?;

        log.originals
            .get(&id)
            .cloned()
            .ok_or(CollaboratorError::NotFound(id))
    }
}
