//! Lazy loader port for reconstructing original, unfiltered content.

use crate::message::{
    domain::{MessageContent, MessageId},
    error::CollaboratorError,
};

/// Result type for lazy loader operations.
pub type LoaderResult<T> = Result<T, CollaboratorError>;

/// Supplies the canonical raw content of a message by identity.
///
/// The aggregate only ever holds one representation of its content. When a
/// consumer needs the text as it was submitted (before re-editing, or after
/// moderation) the aggregate asks this port instead of keeping both.
pub trait LazyLoader: Send + Sync {
    /// Returns the original content for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::NotFound`] when no original is recorded,
    /// or [`CollaboratorError::Loader`] when the lookup fails.
    fn reload(&self, id: MessageId) -> LoaderResult<MessageContent>;
}
