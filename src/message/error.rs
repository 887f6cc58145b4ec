//! Error types for the forum message aggregate and its collaborators.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers. Every failure in construction,
//! validation, or collaborator interaction is returned to the caller;
//! nothing is logged and dropped.

use super::domain::{AccountId, ForumId, LifecyclePhase, MessageId, ThreadId};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when a message's content or command payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The subject is empty or whitespace-only.
    #[error("message subject cannot be empty")]
    EmptySubject,

    /// The body is empty or whitespace-only.
    #[error("message body cannot be empty")]
    EmptyBody,

    /// The subject exceeds the configured length.
    #[error("subject has {actual} characters, exceeds limit of {max}")]
    SubjectTooLong {
        /// The maximum allowed number of characters.
        max: usize,
        /// The actual number of characters.
        actual: usize,
    },

    /// The body exceeds the configured length.
    #[error("body has {actual} characters, exceeds limit of {max}")]
    BodyTooLong {
        /// The maximum allowed number of characters.
        max: usize,
        /// The actual number of characters.
        actual: usize,
    },

    /// Too many upload files were supplied.
    #[error("{actual} attachments exceed limit of {max}")]
    TooManyAttachments {
        /// The maximum allowed number of attachments.
        max: usize,
        /// The actual number of attachments.
        actual: usize,
    },

    /// A reserved property carried a value of the wrong shape.
    #[error("invalid value '{value}' for property '{name}'")]
    InvalidProperty {
        /// The property name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A revision tried to set a property only moderation or digs may
    /// change.
    #[error("property '{name}' cannot be revised directly")]
    ReservedProperty {
        /// The property name.
        name: String,
    },

    /// A reply command was routed to a message other than its parent.
    #[error("reply targets parent {actual} but was sent to message {expected}")]
    ParentMismatch {
        /// The message that received the command.
        expected: MessageId,
        /// The parent named by the command.
        actual: MessageId,
    },

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an invalid property error.
    #[must_use]
    pub fn invalid_property(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidProperty {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Combines validation errors into a single error.
    ///
    /// A single error is returned as-is rather than wrapped. Returns `None`
    /// when `errors` is empty.
    #[must_use]
    pub fn combine(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Returns `true` if this error represents multiple validation failures.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// Returns the individual errors if this is a `Multiple` variant.
    #[must_use]
    pub fn errors(&self) -> Option<&[Self]> {
        match self {
            Self::Multiple(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Failures reported by the aggregate's external collaborators.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The filter pipeline rejected or failed to transform content.
    #[error("content filter failed: {0}")]
    Filter(Arc<dyn std::error::Error + Send + Sync>),

    /// The lazy loader holds no original content for the message.
    #[error("original content not found for message {0}")]
    NotFound(MessageId),

    /// The lazy loader failed for another reason.
    #[error("lazy loader failed: {0}")]
    Loader(Arc<dyn std::error::Error + Send + Sync>),

    /// The event sink did not accept the event batch.
    #[error("event sink rejected events: {0}")]
    EventSink(Arc<dyn std::error::Error + Send + Sync>),

    /// The thread directory has no thread with this identifier.
    #[error("thread not found: {0}")]
    ThreadNotFound(ThreadId),

    /// The owning thread rejected an operation.
    #[error("thread {thread_id} rejected {operation}: {reason}")]
    Thread {
        /// The thread that failed.
        thread_id: ThreadId,
        /// The operation that was attempted.
        operation: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// The owning account rejected an operation.
    #[error("account {account_id} rejected {operation}: {reason}")]
    Account {
        /// The account that failed.
        account_id: AccountId,
        /// The operation that was attempted.
        operation: &'static str,
        /// Description of the failure.
        reason: String,
    },
}

impl CollaboratorError {
    /// Wraps a filter failure.
    #[must_use]
    pub fn filter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Filter(Arc::new(err))
    }

    /// Wraps a lazy loader failure.
    #[must_use]
    pub fn loader(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Loader(Arc::new(err))
    }

    /// Wraps an event sink failure.
    #[must_use]
    pub fn event_sink(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::EventSink(Arc::new(err))
    }

    /// Creates a thread failure.
    #[must_use]
    pub fn thread(thread_id: ThreadId, operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Thread {
            thread_id,
            operation,
            reason: reason.into(),
        }
    }

    /// Creates an account failure.
    #[must_use]
    pub fn account(
        account_id: AccountId,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Account {
            account_id,
            operation,
            reason: reason.into(),
        }
    }
}

/// Errors raised while solidifying a message from its draft.
#[derive(Debug, Clone, Error)]
pub enum ConstructionError {
    /// A mandatory attribute was never supplied to the builder.
    #[error("message {message_id} is missing mandatory attribute '{field}'")]
    MissingField {
        /// The message being built.
        message_id: MessageId,
        /// The attribute that was not supplied.
        field: &'static str,
    },

    /// No filter pipeline was supplied.
    #[error("message {0} has no filter pipeline")]
    MissingFilter(MessageId),

    /// The owning forum reference is missing its name.
    #[error("forum {forum_id} is incomplete for message {message_id}")]
    IncompleteForum {
        /// The message being built.
        message_id: MessageId,
        /// The incomplete forum.
        forum_id: ForumId,
    },

    /// The supplied content or properties are invalid.
    #[error("invalid content: {0}")]
    Content(#[from] ValidationError),

    /// The filter pipeline failed during construction.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Errors returned by commands on the message aggregate.
#[derive(Debug, Clone, Error)]
pub enum MessageError {
    /// Building a new message (for example a reply) failed.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// The command payload is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The message has not completed construction.
    #[error("message is not ready (phase: {0})")]
    NotReady(LifecyclePhase),

    /// A collaborator failed and every change was rolled back.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// A collaborator failed and the rollback could not be completed.
    ///
    /// The aggregate refuses further commands once this is returned.
    #[error("message {message_id} is inconsistent: {cause}; rollback failed: {rollback}")]
    Inconsistent {
        /// The affected message.
        message_id: MessageId,
        /// The failure that triggered the rollback.
        cause: Box<CollaboratorError>,
        /// The failure that interrupted the rollback.
        rollback: Box<CollaboratorError>,
    },
}

/// Errors raised by the message identity map.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// No message is stored under this identifier.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// A message with this identifier is already stored.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// The identifier was not reserved before its message was stored.
    #[error("message identifier not reserved: {0}")]
    NotReserved(MessageId),

    /// Only solidified messages can be stored.
    #[error("cannot store a message that is not ready")]
    NotReady,

    /// The storage backend failed.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RepositoryError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
