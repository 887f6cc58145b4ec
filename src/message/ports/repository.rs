//! Repository port for live message aggregates.
//!
//! The repository is an identity map: it hands out one shared handle per
//! message identifier, and the handle's lock is the single-writer gate for
//! that message's commands.

use crate::message::{
    domain::{ForumMessage, MessageId},
    error::RepositoryError,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Shared, lockable handle to a live message aggregate.
pub type MessageHandle = Arc<Mutex<ForumMessage>>;

/// Port for holding message aggregates between commands.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Message IDs are unique across the repository, counting reservations
/// - Every lookup of an identifier returns the same handle
/// - Concurrent access is handled safely
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a solidified message and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - The message is not ready
    /// - A message with the same ID already exists
    /// - The backing store fails
    async fn insert(&self, message: ForumMessage) -> RepositoryResult<MessageHandle>;

    /// Claims an identifier ahead of the message that will carry it.
    ///
    /// A reserved identifier is refused by [`MessageRepository::insert`] and
    /// by further reservations until it is filled or released.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - The identifier is already stored or reserved
    /// - The backing store fails
    async fn reserve(&self, id: MessageId) -> RepositoryResult<()>;

    /// Stores a solidified message under its reserved identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if:
    /// - The message is not ready
    /// - Its identifier was not reserved
    /// - The backing store fails
    async fn fill_reservation(&self, message: ForumMessage) -> RepositoryResult<MessageHandle>;

    /// Drops a reservation that will not be filled.
    ///
    /// Releasing an identifier that is not reserved does nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing store fails.
    async fn release(&self, id: MessageId) -> RepositoryResult<()>;

    /// Retrieves the handle for a message.
    ///
    /// Returns `None` if the message does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing store fails.
    async fn find_by_id(&self, id: MessageId) -> RepositoryResult<Option<MessageHandle>>;

    /// Checks if a message with the given ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing store fails.
    async fn exists(&self, id: MessageId) -> RepositoryResult<bool>;
}
