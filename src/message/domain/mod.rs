//! Domain types for the forum message subsystem.
//!
//! This module contains pure domain types with no infrastructure
//! dependencies. Collaborators are reached only through the traits in
//! [`crate::message::ports`], handed to each command by reference.

mod attachment;
mod commands;
mod content;
mod events;
mod forum;
mod ids;
mod lifecycle;
mod message;
mod mutation;
mod property;
mod rollback;

pub use attachment::{AttachmentSet, UploadFile};
pub use commands::{PostReplyCommand, ReviseCommand};
pub use content::MessageContent;
pub use events::{CURRENT_SCHEMA_VERSION, EventEnvelope, MessageEvent};
pub use forum::{ForumRef, MessageUrl};
pub use ids::{AccountId, EventId, ForumId, MessageId, ThreadId, UploadFileId};
pub use lifecycle::{LifecycleGuard, LifecyclePhase, Solidified};
pub use message::{
    ForumMessage, MessageBuilder, MessageDraft, MessageKind, MessageState, ThreadBinding,
};
pub use property::{DIG_COUNT_KEY, MASKED_KEY, POST_IP_KEY, Property, PropertySet};
