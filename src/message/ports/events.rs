//! Event sink port for domain events emitted by the message aggregate.

use crate::message::{domain::EventEnvelope, error::CollaboratorError};

/// Result type for event sink operations.
pub type EventSinkResult<T> = Result<T, CollaboratorError>;

/// Receives the domain events produced by message commands.
///
/// # Implementation Notes
///
/// A batch is the complete set of events for one command. Implementations
/// must accept or reject a batch as a whole: a rejected batch leaves no
/// event behind, which lets the aggregate roll back its own state without
/// leaving a stray event downstream. Delivery beyond acceptance is the
/// sink's concern.
pub trait EventSink: Send + Sync {
    /// Publishes a batch of events.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::EventSink`] if the batch was not
    /// accepted. No event of the batch may be retained in that case.
    fn publish(&self, batch: &[EventEnvelope]) -> EventSinkResult<()>;

    /// Publishes a single event.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::EventSink`] if the event was not
    /// accepted.
    fn emit(&self, event: &EventEnvelope) -> EventSinkResult<()> {
        self.publish(std::slice::from_ref(event))
    }
}
