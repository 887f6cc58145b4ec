//! Ports for the owning thread aggregate.
//!
//! A message refers to its thread by identifier only. The thread owns the
//! canonical message collection and the cross-message ordering; the message
//! reaches it through a [`ThreadDirectory`] lookup.

use crate::message::{
    domain::{ForumMessage, MessageId, ThreadId},
    error::CollaboratorError,
};
use std::sync::Arc;

/// Result type for thread operations.
pub type ThreadResult<T> = Result<T, CollaboratorError>;

/// Operations a message needs from its owning thread.
pub trait ForumThread: Send + Sync {
    /// Returns the thread identifier.
    fn id(&self) -> ThreadId;

    /// Returns `true` if `message` is the thread's root message.
    fn is_root(&self, message: MessageId) -> bool;

    /// Returns `true` if `message` has no replies.
    fn is_leaf(&self, message: MessageId) -> bool;

    /// Registers `reply` beneath `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the thread rejects the reply.
    fn add_new_message(&self, parent: MessageId, reply: &ForumMessage) -> ThreadResult<()>;

    /// Removes a previously registered reply.
    ///
    /// Used to compensate a reply registration whose command failed later.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the reply cannot be removed.
    fn remove_message(&self, message: MessageId) -> ThreadResult<()>;

    /// Notifies the thread that `message` changed.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the thread rejects the update.
    fn update_message(&self, message: &ForumMessage) -> ThreadResult<()>;

    /// Notifies the thread that `message` received a dig.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the thread rejects the dig.
    fn add_dig(&self, message: &ForumMessage) -> ThreadResult<()>;

    /// Restores the thread's view of `message` after a command rolled back.
    ///
    /// Unlike [`ForumThread::update_message`] this is not a change
    /// notification. The default implementation delegates to it.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Thread`] if the thread cannot be resynced.
    fn resync(&self, message: &ForumMessage) -> ThreadResult<()> {
        self.update_message(message)
    }
}

/// Lookup from thread identifier to the live thread aggregate.
pub trait ThreadDirectory: Send + Sync {
    /// Returns the thread with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::ThreadNotFound`] if no such thread exists.
    fn thread(&self, id: ThreadId) -> ThreadResult<Arc<dyn ForumThread>>;
}
