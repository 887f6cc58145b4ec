//! Domain events emitted by message commands.
//!
//! Every event carries enough data to replay its state change downstream.
//! Content-bearing events carry the raw submission, so replay can rebuild
//! the original text and, by reapplying the filter, the effective text.

use super::{AccountId, EventId, ForumId, MessageContent, MessageId, Property, ThreadId, UploadFile};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Schema version stamped on newly emitted envelopes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A state change of a forum message.
///
/// # Serialisation
///
/// Events are serialised with a `type` tag field:
///
/// ```json
/// { "type": "message_properties_revised", "message_id": 1, "properties": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageEvent {
    /// A reply was posted beneath a message.
    ReplyPosted {
        /// The message replied to.
        parent_id: MessageId,
        /// The new reply.
        reply_id: MessageId,
        /// The thread both messages belong to.
        thread_id: ThreadId,
        /// The forum hosting the thread.
        forum_id: ForumId,
        /// The account that posted the reply.
        account_id: AccountId,
        /// The reply content as submitted.
        content: MessageContent,
        /// Files attached to the reply.
        attachments: Vec<UploadFile>,
        /// Properties recorded for the reply.
        properties: Vec<Property>,
        /// When the reply was created.
        created_at: DateTime<Utc>,
    },
    /// A message's content was revised.
    MessageRevised {
        /// The revised message.
        message_id: MessageId,
        /// The new content as submitted.
        content: MessageContent,
        /// When the revision happened.
        modified_at: DateTime<Utc>,
    },
    /// A message's property set changed.
    MessagePropertiesRevised {
        /// The affected message.
        message_id: MessageId,
        /// The complete property list after the change.
        properties: Vec<Property>,
    },
    /// A message's attachments were replaced.
    UploadFilesAttached {
        /// The affected message.
        message_id: MessageId,
        /// The complete attachment list after the change.
        files: Vec<UploadFile>,
    },
}

impl MessageEvent {
    /// Returns the canonical event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::ReplyPosted { .. } => "reply_posted",
            Self::MessageRevised { .. } => "message_revised",
            Self::MessagePropertiesRevised { .. } => "message_properties_revised",
            Self::UploadFilesAttached { .. } => "upload_files_attached",
        }
    }

    /// Returns the message that handled the command producing this event.
    ///
    /// For [`MessageEvent::ReplyPosted`] this is the parent.
    #[must_use]
    pub const fn aggregate_id(&self) -> MessageId {
        match self {
            Self::ReplyPosted { parent_id, .. } => *parent_id,
            Self::MessageRevised { message_id, .. }
            | Self::MessagePropertiesRevised { message_id, .. }
            | Self::UploadFilesAttached { message_id, .. } => *message_id,
        }
    }
}

/// A domain event with identity and emission metadata.
///
/// # Examples
///
/// ```
/// use agora::message::domain::{EventEnvelope, MessageEvent, MessageId};
/// use mockable::DefaultClock;
///
/// let envelope = EventEnvelope::new(
///     MessageEvent::MessagePropertiesRevised {
///         message_id: MessageId::new(1),
///         properties: Vec::new(),
///     },
///     &DefaultClock,
/// );
/// assert_eq!(envelope.aggregate_id(), MessageId::new(1));
/// assert_eq!(envelope.event().event_type(), "message_properties_revised");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_id: EventId,
    aggregate_id: MessageId,
    schema_version: u32,
    occurred_at: DateTime<Utc>,
    event: MessageEvent,
}

impl EventEnvelope {
    /// Wraps an event stamped with the clock's current time.
    #[must_use]
    pub fn new(event: MessageEvent, clock: &impl Clock) -> Self {
        Self {
            event_id: EventId::new(),
            aggregate_id: event.aggregate_id(),
            schema_version: CURRENT_SCHEMA_VERSION,
            occurred_at: clock.utc(),
            event,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the message that handled the command.
    #[must_use]
    pub const fn aggregate_id(&self) -> MessageId {
        self.aggregate_id
    }

    /// Returns the schema version.
    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Returns when the event was emitted.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the event payload.
    #[must_use]
    pub const fn event(&self) -> &MessageEvent {
        &self.event
    }

    /// Consumes the envelope and returns the payload.
    #[must_use]
    pub fn into_event(self) -> MessageEvent {
        self.event
    }
}
